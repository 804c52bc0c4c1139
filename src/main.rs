//! Robo Blitz entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use robo_blitz::audio::{AudioManager, SoundEffect};
    use robo_blitz::consts::*;
    use robo_blitz::quiz::QuizSession;
    use robo_blitz::sim::{self, GameEvent, GamePhase, GameState, TargetKind};

    /// App instance holding all state
    struct App {
        state: GameState,
        quiz: QuizSession,
        audio: AudioManager,
        last_time: f64,
        /// Fractional milliseconds not yet fed to the sim
        accumulator: f64,
        /// Timestamp of the last alarm sweep
        last_alarm: f64,
    }

    impl App {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                quiz: QuizSession::new(),
                audio: AudioManager::new(),
                last_time: 0.0,
                accumulator: 0.0,
                last_alarm: 0.0,
            }
        }

        /// Advance the sim by the elapsed wall time
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, 250.0)
            } else {
                0.0
            };
            self.last_time = time;

            self.accumulator += dt;
            let whole_ms = self.accumulator.floor();
            self.accumulator -= whole_ms;
            sim::advance(&mut self.state, whole_ms as u64);

            for event in self.state.drain_events() {
                self.handle_event(event);
            }

            // The countdown alarm loops while a session is live
            if self.state.phase == GamePhase::Playing
                && time - self.last_alarm >= ALARM_PERIOD_MS
            {
                self.audio.play(SoundEffect::Alarm);
                self.last_alarm = time;
            }
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::TargetDestroyed { kind, .. } => {
                    self.audio.play(match kind {
                        TargetKind::Normal => SoundEffect::DestroyNormal,
                        TargetKind::Fast => SoundEffect::DestroyFast,
                        TargetKind::Golden => SoundEffect::DestroyGolden,
                        TargetKind::Boss => SoundEffect::DestroyBoss,
                    });
                    if self.state.combo == COMBO_TIER_ONE || self.state.combo == COMBO_TIER_TWO {
                        self.audio.play(SoundEffect::ComboMilestone);
                    }
                }
                GameEvent::PowerUpCollected(_) => {
                    self.audio.play(SoundEffect::PowerUpCollect);
                }
                GameEvent::CountdownTick(_) => {}
                GameEvent::Success => {
                    self.audio.play(SoundEffect::Success);
                    log::info!("Mission success: score {}", self.state.score);
                }
                GameEvent::Failed => {
                    self.audio.play(SoundEffect::Failure);
                    log::info!("Mission failed: score {}", self.state.score);
                }
            }
        }
    }

    fn document() -> Document {
        web_sys::window()
            .expect("no window")
            .document()
            .expect("no document")
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(doc: &Document, id: &str, visible: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            if visible {
                el.class_list().remove_1("hidden").ok();
            } else {
                el.class_list().add_1("hidden").ok();
            }
        }
    }

    // === Rendering ===

    /// Update HUD elements and phase panels in the DOM
    fn render_hud(app: &App, doc: &Document) {
        let state = &app.state;

        set_text(doc, "hud-score", &format!("{}/{}", state.score, SCORE_TARGET));
        set_text(doc, "hud-time", &format!("{}s", state.time_left));
        set_text(doc, "hud-combo", &format!("x{}", state.combo));
        set_text(doc, "hud-max-combo", &state.max_combo.to_string());
        set_visible(doc, "hud-combo-box", state.combo > 0);
        set_visible(doc, "badge-double-points", state.double_points);
        set_visible(doc, "badge-slow-time", state.slow_time);

        set_visible(doc, "panel-ready", state.phase == GamePhase::Ready);
        set_visible(doc, "panel-playing", state.phase == GamePhase::Playing);
        set_visible(doc, "panel-success", state.phase == GamePhase::Success);
        set_visible(doc, "panel-failed", state.phase == GamePhase::Failed);

        if state.phase == GamePhase::Success {
            set_text(doc, "final-score", &state.score.to_string());
            set_text(doc, "final-max-combo", &format!("x{}", state.max_combo));
            set_text(doc, "final-time-left", &format!("{}s", state.time_left));
        }
    }

    /// Reconcile the active entity sets into play-field DOM nodes
    fn render_entities(app: &App, doc: &Document) {
        let Some(field) = doc.get_element_by_id("play-field") else {
            return;
        };
        let state = &app.state;

        for target in &state.targets {
            let dom_id = format!("target-{}", target.id);
            let el = ensure_node(doc, &field, &dom_id, &format!("target target-{}", target.kind.as_str()));
            if let Some(el) = el {
                el.set_attribute(
                    "style",
                    &format!(
                        "left:{:.2}%;top:{:.2}%;width:{:.0}px;height:{:.0}px;animation-duration:{:.2}s",
                        target.pos.x,
                        target.pos.y,
                        target.visual_size,
                        target.visual_size,
                        state.animation_speed(target),
                    ),
                )
                .ok();
                el.set_text_content(Some(&format!("+{}", target.reward)));
            }
        }

        for power_up in &state.power_ups {
            let dom_id = format!("powerup-{}", power_up.id);
            let el = ensure_node(
                doc,
                &field,
                &dom_id,
                &format!("powerup powerup-{}", power_up.kind.as_str()),
            );
            if let Some(el) = el {
                el.set_attribute(
                    "style",
                    &format!("left:{:.2}%;top:{:.2}%", power_up.pos.x, power_up.pos.y),
                )
                .ok();
                el.set_text_content(Some(power_up.kind.label()));
            }
        }

        for explosion in &state.explosions {
            let dom_id = format!("explosion-{}", explosion.id);
            let el = ensure_node(
                doc,
                &field,
                &dom_id,
                &format!("explosion explosion-{}", explosion.kind.as_str()),
            );
            if let Some(el) = el {
                el.set_attribute(
                    "style",
                    &format!("left:{:.2}%;top:{:.2}%", explosion.pos.x, explosion.pos.y),
                )
                .ok();
                el.set_text_content(Some(&format!("+{}", explosion.reward)));
            }
        }

        prune_stale(&field, "target-", &state.targets.iter().map(|t| t.id).collect::<Vec<_>>());
        prune_stale(
            &field,
            "powerup-",
            &state.power_ups.iter().map(|p| p.id).collect::<Vec<_>>(),
        );
        prune_stale(
            &field,
            "explosion-",
            &state.explosions.iter().map(|e| e.id).collect::<Vec<_>>(),
        );
    }

    /// Find or create a play-field node with the given id and classes
    fn ensure_node(doc: &Document, field: &Element, id: &str, class: &str) -> Option<Element> {
        if let Some(el) = doc.get_element_by_id(id) {
            return Some(el);
        }
        let el = doc.create_element("div").ok()?;
        el.set_attribute("id", id).ok()?;
        el.set_attribute("class", class).ok()?;
        field.append_child(&el).ok()?;
        Some(el)
    }

    /// Remove child nodes whose id carries `prefix` but is no longer live
    fn prune_stale(field: &Element, prefix: &str, live: &[u64]) {
        let children = field.children();
        let mut stale: Vec<Element> = Vec::new();
        for i in 0..children.length() {
            let Some(child) = children.item(i) else { continue };
            let id = child.id();
            if let Some(rest) = id.strip_prefix(prefix) {
                if rest.parse::<u64>().map(|n| !live.contains(&n)).unwrap_or(true) {
                    stale.push(child);
                }
            }
        }
        for el in stale {
            el.remove();
        }
    }

    /// Render the quiz page elements
    fn render_quiz(app: &App, doc: &Document) {
        let quiz = &app.quiz;
        set_visible(doc, "quiz-results", quiz.is_complete());
        set_visible(doc, "quiz-card", !quiz.is_complete());

        if let Some(q) = quiz.current_question() {
            set_text(doc, "quiz-question", &q.question);
            set_text(
                doc,
                "quiz-progress",
                &format!("{}/{}", quiz.current_index() + 1, quiz.questions().len()),
            );
            for (i, option) in q.options.iter().enumerate() {
                set_text(doc, &format!("quiz-option-{}", i), option);
            }
        } else {
            set_text(
                doc,
                "quiz-score",
                &format!("{}/{}", quiz.score(), quiz.questions().len()),
            );
            set_text(
                doc,
                "quiz-verdict",
                if quiz.passed() {
                    "Training Complete!"
                } else {
                    "Training Failed - you need more than 2 correct. Try again!"
                },
            );
        }
    }

    // === Wiring ===

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Robo Blitz starting...");

        let doc = document();

        // Hide loading indicator
        if let Some(loading) = doc.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));
        log::info!("App initialized with seed: {}", seed);

        setup_buttons(app.clone());
        setup_play_field(app.clone());
        setup_quiz(app.clone());

        render_quiz(&app.borrow(), &doc);
        request_animation_frame(app);

        log::info!("Robo Blitz running!");
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let doc = document();

        // Start and retry do the same thing: a full fresh session
        for btn_id in ["start-btn", "retry-btn"] {
            if let Some(btn) = doc.get_element_by_id(btn_id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.audio.play(SoundEffect::ButtonClick);
                    sim::start(&mut a.state);
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = doc.get_element_by_id("mute-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                let muted = !a.audio.muted();
                a.audio.set_muted(muted);
                log::info!("Audio muted: {}", muted);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One delegated listener resolves play-field clicks to entity ids.
    /// Stale clicks (expired or already-destroyed entities) are no-ops in
    /// the sim, so no guard is needed here.
    fn setup_play_field(app: Rc<RefCell<App>>) {
        let doc = document();
        let Some(field) = doc.get_element_by_id("play-field") else {
            log::warn!("No play-field element; game view disabled");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target_el) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
            else {
                return;
            };
            let mut a = app.borrow_mut();

            if let Some(el) = target_el.closest(".target").ok().flatten() {
                if let Some(id) = parse_entity_id(&el.id(), "target-") {
                    sim::eliminate(&mut a.state, id);
                }
            } else if let Some(el) = target_el.closest(".powerup").ok().flatten() {
                if let Some(id) = parse_entity_id(&el.id(), "powerup-") {
                    sim::collect(&mut a.state, id);
                }
            }
        });
        let _ = field.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn parse_entity_id(dom_id: &str, prefix: &str) -> Option<u64> {
        dom_id.strip_prefix(prefix)?.parse().ok()
    }

    fn setup_quiz(app: Rc<RefCell<App>>) {
        let doc = document();

        for i in 0..4usize {
            if let Some(btn) = doc.get_element_by_id(&format!("quiz-option-{}", i)) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    match a.quiz.answer(i) {
                        Some(true) => a.audio.play(SoundEffect::QuizCorrect),
                        Some(false) => a.audio.play(SoundEffect::QuizWrong),
                        None => return,
                    }
                    render_quiz(&a, &document());
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = doc.get_element_by_id("quiz-retry-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.play(SoundEffect::ButtonClick);
                a.quiz.reset();
                render_quiz(&a, &document());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            let doc = document();
            render_hud(&a, &doc);
            render_entities(&a, &doc);
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Robo Blitz (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Headless smoke run: play a session with no clicks and let it time out
    run_headless_session();
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless_session() {
    use robo_blitz::sim::{self, GamePhase, GameState};

    let mut state = GameState::new(0xB10B);
    sim::start(&mut state);

    let mut elapsed = 0u64;
    while state.phase == GamePhase::Playing && elapsed < 60_000 {
        sim::advance(&mut state, 16);
        elapsed += 16;
    }

    println!(
        "Headless session finished: {:?} after {}ms (score {}, {} targets live)",
        state.phase,
        elapsed,
        state.score,
        state.targets.len()
    );
    assert_eq!(state.phase, GamePhase::Failed);
    println!("✓ Sim smoke run passed!");
}
