use crate::settings::GlobeSettings;

/// Runtime configuration for the globe, merged from settings file and CLI flags
#[derive(Clone, Debug)]
pub struct GlobeConfig {
    pub time_step: f32,       // Seconds per frame
    pub seed: Option<u64>,
    pub max_arcs: usize,      // Live-arc window cap
    pub spawn_interval: f32,  // Base seconds between spawns
    pub spawn_jitter: f32,    // Extra random seconds added to each interval
    pub burst: usize,         // Arcs spawned at start-up
    pub min_duration: f32,
    pub max_duration: f32,
    pub particles: usize,
    pub color_scheme: u8,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            time_step: 0.033,
            seed: None,
            max_arcs: 18,
            spawn_interval: 0.55,
            spawn_jitter: 0.45,
            burst: 6,
            min_duration: 2.2,
            max_duration: 3.6,
            particles: 250,
            color_scheme: 2,
        }
    }
}

impl GlobeConfig {
    /// Defaults overlaid with whatever the settings file provides.
    pub fn from_settings(settings: &GlobeSettings) -> Self {
        let d = Self::default();
        Self {
            time_step: d.time_step,
            seed: None,
            max_arcs: settings.max_arcs.unwrap_or(d.max_arcs),
            spawn_interval: settings.spawn_interval.unwrap_or(d.spawn_interval),
            spawn_jitter: settings.spawn_jitter.unwrap_or(d.spawn_jitter),
            burst: settings.burst.unwrap_or(d.burst),
            min_duration: settings.min_duration.unwrap_or(d.min_duration),
            max_duration: settings.max_duration.unwrap_or(d.max_duration),
            particles: settings.particles.unwrap_or(d.particles),
            color_scheme: settings.color_scheme.unwrap_or(d.color_scheme),
        }
        .clamped()
    }

    /// Pull every field back into a range the scene can handle.
    pub fn clamped(mut self) -> Self {
        self.time_step = self.time_step.clamp(0.005, 0.5);
        self.max_arcs = self.max_arcs.clamp(1, 64);
        self.spawn_interval = self.spawn_interval.clamp(0.1, 5.0);
        self.spawn_jitter = self.spawn_jitter.clamp(0.0, 5.0);
        self.burst = self.burst.min(self.max_arcs);
        self.min_duration = self.min_duration.clamp(0.5, 20.0);
        self.max_duration = self.max_duration.clamp(self.min_duration, 20.0);
        self.particles = self.particles.min(2000);
        self.color_scheme = self.color_scheme.min(9);
        self
    }
}
