use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::EventListener;
use rand::rngs::StdRng;
use rand::SeedableRng;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use crate::backdrop::{frame_shapes, AnimationFrames, FrameLoop, Palette, Population};
use crate::config::BackdropConfig;
use crate::gpu::{Renderer, Tessellator};
use crate::theme::{use_theme_mode, ThemeMode};
use crate::types::Viewport;

/// Props for the animated background
#[derive(Properties, Clone, PartialEq)]
pub struct BackdropProps {
    #[prop_or_default]
    pub config: BackdropConfig,
}

/// Everything one frame needs
struct BackdropScene {
    renderer: Renderer,
    tessellator: Tessellator,
    population: Population,
    viewport: Viewport,
    rng: StdRng,
    config: BackdropConfig,
    mode: Rc<Cell<ThemeMode>>,
}

impl BackdropScene {
    fn draw_frame(&mut self) {
        self.population
            .step(self.viewport, &self.config, &mut self.rng);

        let palette = Palette::for_mode(self.mode.get());
        let shapes = frame_shapes(&self.population, &palette, &self.config);
        let mesh = self.tessellator.tessellate_shapes(&shapes);

        if let Err(e) = self.renderer.render(&mesh) {
            log::debug!("skipped backdrop frame: {e}");
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.surface_size();
        self.viewport = viewport;
        self.renderer.resize(width, height);
    }
}

/// Running animation: the frame loop and the resize listener.
/// Dropping it stops both.
struct RunningBackdrop {
    _frames: FrameLoop<AnimationFrames>,
    _resize: EventListener,
}

impl RunningBackdrop {
    fn start(canvas: HtmlCanvasElement, scene: BackdropScene) -> Self {
        let scene = Rc::new(RefCell::new(scene));

        let resize = {
            let scene = scene.clone();
            EventListener::new(&gloo_utils::window(), "resize", move |_| {
                let viewport = Viewport::current();
                size_canvas(&canvas, viewport);
                scene.borrow_mut().resize(viewport);
            })
        };

        let frames = FrameLoop::start(AnimationFrames, move || scene.borrow_mut().draw_frame());

        Self {
            _frames: frames,
            _resize: resize,
        }
    }
}

impl Drop for RunningBackdrop {
    fn drop(&mut self) {
        log::debug!("backdrop animation stopped");
    }
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
    let (width, height) = viewport.surface_size();
    canvas.set_width(width);
    canvas.set_height(height);
}

/// Full-viewport decorative background: rising hearts and heartbeat traces
/// drawn through wgpu, colored by the current display mode.
///
/// Activation is asynchronous (surface acquisition). If the component is
/// removed before that completes, the loop never starts.
#[function_component(Backdrop)]
pub fn backdrop(props: &BackdropProps) -> Html {
    let canvas_ref = use_node_ref();
    let mode = use_theme_mode();
    let mode_cell = use_memo((), move |_| Rc::new(Cell::new(mode)));

    // Push display mode changes to the running loop
    {
        let mode_cell = mode_cell.clone();
        use_effect_with(mode, move |mode| {
            mode_cell.set(*mode);
            || ()
        });
    }

    {
        let canvas_ref = canvas_ref.clone();
        let config = props.config.clone();
        let mode_cell = (*mode_cell).clone();

        use_effect_with((), move |_| {
            let active = Rc::new(Cell::new(true));
            let running: Rc<RefCell<Option<RunningBackdrop>>> = Rc::new(RefCell::new(None));

            match canvas_ref.cast::<HtmlCanvasElement>() {
                Some(canvas) => {
                    let viewport = Viewport::current();
                    size_canvas(&canvas, viewport);

                    let active = active.clone();
                    let running = running.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        let renderer = match Renderer::new(canvas.clone()).await {
                            Ok(renderer) => renderer,
                            Err(e) => {
                                log::warn!("backdrop disabled: {e}");
                                return;
                            }
                        };
                        if !active.get() {
                            return;
                        }

                        // The viewport may have changed while the surface was acquired
                        let viewport = Viewport::current();
                        size_canvas(&canvas, viewport);
                        let mut renderer = renderer;
                        let (width, height) = viewport.surface_size();
                        renderer.resize(width, height);

                        let mut rng = StdRng::from_entropy();
                        let population = Population::spawn(viewport, &config, &mut rng);
                        let scene = BackdropScene {
                            renderer,
                            tessellator: Tessellator::new(),
                            population,
                            viewport,
                            rng,
                            config,
                            mode: mode_cell,
                        };
                        *running.borrow_mut() = Some(RunningBackdrop::start(canvas, scene));
                    });
                }
                None => log::warn!("backdrop disabled: canvas element missing"),
            }

            move || {
                active.set(false);
                running.borrow_mut().take();
            }
        });
    }

    html! {
        <>
            <div class="fixed inset-0 -z-20 bg-gradient-to-br from-indigo-100 via-purple-50 to-pink-50 dark:from-indigo-900/30 dark:via-purple-900/30 dark:to-pink-900/30">
                <div class="absolute inset-0 bg-white/80 dark:bg-gray-900/50 backdrop-blur-[100px]"></div>
            </div>
            <canvas
                ref={canvas_ref}
                class="fixed inset-0 -z-10 pointer-events-none"
                aria-hidden="true"
            />
        </>
    }
}
