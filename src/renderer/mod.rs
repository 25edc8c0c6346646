use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use image::{Rgb, RgbImage};

use crate::{
    aov::{create_aov_container, AovFrame, MAX_AOV_COUNT},
    camera::CameraT,
    core::{color::Spectrum, rng::SamplingContext, scene::Scene, scene::ShadingContext},
    lighting::{DrtLightingEngineFactory, LightingEngineT},
    shader::{ShadingResult, SurfaceShader, SurfaceShaderT},
};

/// Accumulated per-pixel channel sums. Pixel values are the mean over
/// all samples added for that pixel.
pub struct Film {
    width: u32,
    height: u32,
    num_channels: usize,
    channels: Vec<Vec<(Spectrum, f32)>>,
    counts: Vec<u32>,
}

impl Film {
    pub fn new(width: u32, height: u32, num_channels: usize) -> Self {
        let num_pixels = (width * height) as usize;
        Self {
            width,
            height,
            num_channels,
            channels: vec![vec![(Spectrum::BLACK, 0.0); num_pixels]; num_channels],
            counts: vec![0; num_pixels],
        }
    }

    #[allow(dead_code)]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn add_frame(&mut self, x: u32, y: u32, frame: &AovFrame) {
        let index = self.index_of(x, y);
        for (c, channel) in self.channels.iter_mut().enumerate() {
            let (color, alpha) = frame.get(c);
            let slot = &mut channel[index];
            slot.0 += color;
            slot.1 += alpha;
        }
        self.counts[index] += 1;
    }

    pub fn pixel(&self, channel: usize, x: u32, y: u32) -> (Spectrum, f32) {
        let index = self.index_of(x, y);
        let count = self.counts[index].max(1) as f32;
        let (color, alpha) = self.channels[channel][index];
        (color / count, alpha / count)
    }

    pub fn to_images(&self) -> Vec<RgbImage> {
        let mut images = Vec::with_capacity(self.num_channels);
        for c in 0..self.num_channels {
            let mut image = RgbImage::new(self.width, self.height);
            for y in 0..self.height {
                for x in 0..self.width {
                    let (color, _) = self.pixel(c, x, y);
                    image.put_pixel(x, y, spectrum_to_rgb(color));
                }
            }
            images.push(image);
        }
        images
    }

    fn index_of(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }
}

fn spectrum_to_rgb(color: Spectrum) -> Rgb<u8> {
    let rgb: [f32; 3] = color.into();
    Rgb([
        (rgb[0] * 255.0).clamp(0.0, 255.0) as u8,
        (rgb[1] * 255.0).clamp(0.0, 255.0) as u8,
        (rgb[2] * 255.0).clamp(0.0, 255.0) as u8,
    ])
}

pub struct Renderer {
    scene: Scene,
    shader: SurfaceShader,
    engine_factory: DrtLightingEngineFactory,
    aov_names: Vec<String>,
    width: u32,
    height: u32,
    spp: u32,
}

impl Renderer {
    pub fn new(
        scene: Scene,
        shader: SurfaceShader,
        engine_factory: DrtLightingEngineFactory,
        aov_names: Vec<String>,
        width: u32,
        height: u32,
        spp: u32,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "output: size should be positive");
        anyhow::ensure!(
            aov_names.len() < MAX_AOV_COUNT,
            format!("aovs: more than {} channels", MAX_AOV_COUNT)
        );
        // fail on unknown channel names before any rendering starts
        create_aov_container(&aov_names)?;
        Ok(Self {
            scene,
            shader,
            engine_factory,
            aov_names,
            width,
            height,
            spp,
        })
    }

    pub fn aov_names(&self) -> anyhow::Result<Vec<&'static str>> {
        Ok(create_aov_container(&self.aov_names)?.names())
    }

    pub fn render(&self, abort: &AtomicBool) -> anyhow::Result<Film> {
        let (width, height) = (self.width, self.height);
        let num_channels = self.aov_names.len() + 1;
        let film = Arc::new(Mutex::new(Film::new(width, height, num_channels)));
        let aspect = width as f32 / height as f32;

        let progress_bar = indicatif::ProgressBar::new((width * height) as u64);
        progress_bar.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (eta: {eta})")
                .progress_chars("#>-"),
        );

        #[derive(Copy, Clone)]
        struct ImageRange {
            from: u32,
            to: u32,
        }
        let num_threads = num_cpus::get() as u32 * 2;
        let height_per_thread = height / num_threads;
        let mut ranges = Vec::with_capacity(num_threads as usize);
        for t in 0..num_threads {
            let from = t * height_per_thread;
            let to = if t + 1 == num_threads {
                height
            } else {
                (t + 1) * height_per_thread
            };
            ranges.push(ImageRange { from, to });
        }

        let mut containers = Vec::with_capacity(ranges.len());
        for _ in 0..ranges.len() {
            containers.push(create_aov_container(&self.aov_names)?);
        }

        crossbeam::scope(|scope| {
            for (range, mut container) in ranges.into_iter().zip(containers.into_iter()) {
                let width_inv = 1.0 / width as f32;
                let height_inv = 1.0 / height as f32;
                let spp = self.spp;
                let film = film.clone();
                let progress_bar = progress_bar.clone();
                let renderer = &self;
                let ImageRange { from, to } = range;

                scope.spawn(move |_| {
                    let mut ctx = SamplingContext::new();
                    let mut engine = renderer.engine_factory.create();
                    let shading_ctx = ShadingContext::new(&renderer.scene);

                    'rows: for j in from..to {
                        for i in 0..width {
                            if abort.load(Ordering::Relaxed) {
                                break 'rows;
                            }
                            for _ in 0..spp {
                                let (offset_x, offset_y) = ctx.uniform_2d();
                                let x = ((i as f32 + offset_x) * width_inv - 0.5) * aspect;
                                let y =
                                    ((height - j - 1) as f32 + offset_y) * height_inv - 0.5;
                                let ray = renderer.scene.camera().generate_ray((x, y));

                                container.reset();
                                match renderer.scene.aggregate().intersect(&ray) {
                                    Some(sp) => {
                                        let mut result = ShadingResult::transparent_black();
                                        renderer.shader.evaluate(
                                            &mut ctx,
                                            &shading_ctx,
                                            &mut engine,
                                            &sp,
                                            &mut result,
                                        );
                                        container.accumulate(
                                            Some(&sp),
                                            &result.color,
                                            result.alpha,
                                        );
                                    }
                                    None => {
                                        let color = renderer
                                            .scene
                                            .environment()
                                            .map(|env| env.radiance())
                                            .unwrap_or(Spectrum::BLACK);
                                        container.accumulate(None, &color, 0.0);
                                    }
                                }

                                let mut frame = AovFrame::new();
                                container.flush(&mut frame);
                                film.lock().unwrap().add_frame(i, j, &frame);
                            }
                            progress_bar.inc(1);
                        }
                    }

                    engine.finalize();
                });
            }
        })
        .unwrap();
        progress_bar.finish();

        let film = Arc::try_unwrap(film)
            .map_err(|_| anyhow::anyhow!("render threads still hold the film"))?
            .into_inner()
            .map_err(|_| anyhow::anyhow!("film lock poisoned"))?;
        Ok(film)
    }
}
