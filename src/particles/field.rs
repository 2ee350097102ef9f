//! Pure particle-field simulation: spawning, per-frame advance, proximity
//! links. No DOM types appear here so the whole module runs under native
//! `cargo test`; the canvas binding in the parent module only reads state out.

use crate::rng::XorShift64;

/// Renderer tunables. Defaults reproduce the site's original look.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldConfig {
    /// Canvas area (px²) per particle; count = floor(width * height / this).
    pub area_per_particle: f64,
    /// Particle radius band `[radius_min, radius_max)` in px.
    pub radius_min: f64,
    pub radius_max: f64,
    /// Velocity components are drawn from `[-speed_limit, speed_limit)`,
    /// in px per frame.
    pub speed_limit: f64,
    /// Particle opacity band `[opacity_min, opacity_max)`.
    pub opacity_min: f64,
    pub opacity_max: f64,
    /// Distance (px) under which two particles get a connecting line.
    pub link_distance: f64,
    /// Link opacity at distance 0; decays linearly to 0 at `link_distance`.
    pub link_alpha: f64,
    /// Base RGB color shared by particles and links.
    pub color: (u8, u8, u8),
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            area_per_particle: 20_000.0,
            radius_min: 0.5,
            radius_max: 2.5,
            speed_limit: 0.25,
            opacity_min: 0.1,
            opacity_max: 0.4,
            link_distance: 150.0,
            link_alpha: 0.15,
            color: (99, 102, 241),
        }
    }
}

impl FieldConfig {
    /// Link opacity for a pair at `distance`; `None` at or beyond the
    /// threshold (no line drawn).
    pub fn link_alpha_at(&self, distance: f64) -> Option<f64> {
        if distance >= self.link_distance {
            None
        } else {
            Some((1.0 - distance / self.link_distance) * self.link_alpha)
        }
    }

    /// Particle count for a surface of the given pixel dimensions.
    pub fn count_for(&self, width: f64, height: f64) -> usize {
        if width <= 0.0 || height <= 0.0 {
            return 0;
        }
        (width * height / self.area_per_particle).floor() as usize
    }
}

/// A single background particle. Plain value; identity is its array index.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub radius: f64,
    pub opacity: f64,
}

impl Particle {
    fn spawn(cfg: &FieldConfig, rng: &mut XorShift64, width: f64, height: f64) -> Self {
        Self {
            x: rng.range(0.0, width),
            y: rng.range(0.0, height),
            speed_x: rng.range(-cfg.speed_limit, cfg.speed_limit),
            speed_y: rng.range(-cfg.speed_limit, cfg.speed_limit),
            radius: rng.range(cfg.radius_min, cfg.radius_max),
            opacity: rng.range(cfg.opacity_min, cfg.opacity_max),
        }
    }

    /// Advance one frame. Boundary policy is wraparound: `rem_euclid` keeps
    /// both coordinates inside `[0, len)` even for exits past either edge.
    fn advance(&mut self, width: f64, height: f64) {
        self.x = (self.x + self.speed_x).rem_euclid(width);
        self.y = (self.y + self.speed_y).rem_euclid(height);
    }
}

/// The particle set plus the surface dimensions it lives on. Owns its RNG so
/// regeneration is deterministic for a fixed seed.
pub struct ParticleField {
    config: FieldConfig,
    rng: XorShift64,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Empty field; call [`resize`](Self::resize) to populate it.
    pub fn new(config: FieldConfig, rng: XorShift64) -> Self {
        Self {
            config,
            rng,
            width: 0.0,
            height: 0.0,
            particles: Vec::new(),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Discard the current set and regenerate for the new dimensions.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        let count = self.config.count_for(width, height);
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles
                .push(Particle::spawn(&self.config, &mut self.rng, width, height));
        }
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.advance(self.width, self.height);
        }
    }

    /// Visit each linked pair exactly once. The inner index starts past the
    /// outer one, so a particle is never paired with itself and no unordered
    /// pair is seen twice. O(n²), fine for the low hundreds of particles a
    /// screen-sized canvas yields.
    pub fn for_each_link(&self, mut f: impl FnMut(usize, usize, f64)) {
        for a in 0..self.particles.len() {
            for b in (a + 1)..self.particles.len() {
                let dx = self.particles[a].x - self.particles[b].x;
                let dy = self.particles[a].y - self.particles[b].y;
                let distance = (dx * dx + dy * dy).sqrt();
                if let Some(alpha) = self.config.link_alpha_at(distance) {
                    f(a, b, alpha);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_at(width: f64, height: f64) -> ParticleField {
        let mut field = ParticleField::new(FieldConfig::default(), XorShift64::new(42));
        field.resize(width, height);
        field
    }

    #[test]
    fn count_follows_area_formula() {
        let cfg = FieldConfig::default();
        assert_eq!(cfg.count_for(800.0, 600.0), 24);
        assert_eq!(cfg.count_for(0.0, 0.0), 0);
        assert_eq!(cfg.count_for(1920.0, 1080.0), 103);
        // Sub-threshold area rounds down to nothing.
        assert_eq!(cfg.count_for(100.0, 100.0), 0);
    }

    #[test]
    fn spawn_respects_bounds_and_bands() {
        let field = field_at(800.0, 600.0);
        assert_eq!(field.particles().len(), 24);
        let cfg = field.config();
        for p in field.particles() {
            assert!((0.0..800.0).contains(&p.x));
            assert!((0.0..600.0).contains(&p.y));
            assert!((cfg.radius_min..cfg.radius_max).contains(&p.radius));
            assert!((cfg.opacity_min..cfg.opacity_max).contains(&p.opacity));
            assert!(p.speed_x.abs() <= cfg.speed_limit);
            assert!(p.speed_y.abs() <= cfg.speed_limit);
        }
    }

    #[test]
    fn wraparound_keeps_particles_inside() {
        let mut field = field_at(400.0, 300.0);
        assert_eq!(field.particles().len(), 6);
        for _ in 0..20_000 {
            field.step();
            for p in field.particles() {
                assert!((0.0..400.0).contains(&p.x), "x escaped: {}", p.x);
                assert!((0.0..300.0).contains(&p.y), "y escaped: {}", p.y);
            }
        }
    }

    #[test]
    fn wraparound_crosses_each_edge() {
        let mut p = Particle {
            x: 99.9,
            y: 0.1,
            speed_x: 0.2,
            speed_y: -0.2,
            radius: 1.0,
            opacity: 0.2,
        };
        p.advance(100.0, 100.0);
        assert!((p.x - 0.1).abs() < 1e-9);
        assert!((p.y - 99.9).abs() < 1e-9);
    }

    #[test]
    fn stepping_an_empty_field_is_harmless() {
        let mut field = field_at(0.0, 0.0);
        assert!(field.particles().is_empty());
        field.step();
        let mut called = false;
        field.for_each_link(|_, _, _| called = true);
        assert!(!called);
    }

    #[test]
    fn resize_regenerates_to_new_count() {
        let mut field = field_at(800.0, 600.0);
        assert_eq!(field.particles().len(), 24);
        field.resize(400.0, 300.0);
        assert_eq!(field.particles().len(), 6);
        field.resize(1000.0, 1000.0);
        assert_eq!(field.particles().len(), 50);
    }

    #[test]
    fn link_alpha_peaks_at_zero_and_dies_at_threshold() {
        let cfg = FieldConfig::default();
        assert_eq!(cfg.link_alpha_at(0.0), Some(cfg.link_alpha));
        assert_eq!(cfg.link_alpha_at(cfg.link_distance), None);
        assert_eq!(cfg.link_alpha_at(cfg.link_distance + 50.0), None);
        let near = cfg.link_alpha_at(cfg.link_distance - 1e-9).unwrap();
        assert!(near > 0.0 && near < 1e-6);
    }

    #[test]
    fn link_alpha_is_monotonically_non_increasing() {
        let cfg = FieldConfig::default();
        let mut prev = f64::INFINITY;
        let mut d = 0.0;
        while d < cfg.link_distance {
            let a = cfg.link_alpha_at(d).unwrap();
            assert!(a <= prev, "alpha rose between {} and {}", d - 0.5, d);
            prev = a;
            d += 0.5;
        }
    }

    #[test]
    fn links_are_irreflexive_and_visited_once() {
        // Dense square so plenty of pairs fall under the threshold.
        let particles: Vec<Particle> = (0..10)
            .map(|i| Particle {
                x: (i % 5) as f64 * 30.0,
                y: (i / 5) as f64 * 30.0,
                speed_x: 0.0,
                speed_y: 0.0,
                radius: 1.0,
                opacity: 0.2,
            })
            .collect();
        let field = ParticleField {
            config: FieldConfig::default(),
            rng: XorShift64::new(1),
            width: 200.0,
            height: 200.0,
            particles,
        };
        let mut seen = std::collections::HashSet::new();
        field.for_each_link(|a, b, alpha| {
            assert_ne!(a, b, "particle linked to itself");
            assert!(a < b, "pair ({a},{b}) visited out of order");
            assert!(seen.insert((a, b)), "pair ({a},{b}) visited twice");
            assert!(alpha > 0.0 && alpha <= field.config.link_alpha);
        });
        // All 45 unordered pairs of the 10 particles lie within 150px here.
        assert_eq!(seen.len(), 45);
    }

    #[test]
    fn coincident_particles_link_at_full_alpha() {
        let particles = vec![
            Particle {
                x: 10.0,
                y: 10.0,
                speed_x: 0.0,
                speed_y: 0.0,
                radius: 1.0,
                opacity: 0.2,
            };
            2
        ];
        let field = ParticleField {
            config: FieldConfig::default(),
            rng: XorShift64::new(1),
            width: 100.0,
            height: 100.0,
            particles,
        };
        let mut alphas = Vec::new();
        field.for_each_link(|_, _, alpha| alphas.push(alpha));
        assert_eq!(alphas, vec![field.config.link_alpha]);
    }
}
