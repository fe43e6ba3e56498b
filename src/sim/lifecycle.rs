/// Transient entity lifecycle: projectiles and particles.
///
/// Each frame a pool is advanced once, then pruned once. Nothing is
/// removed while the advance pass iterates; entries flagged inactive
/// during the pass are dropped by `prune` before the next frame starts.

use crate::domain::entity::{Particle, Projectile, PROJECTILE_WORLD};

pub trait Transient {
    fn advance(&mut self, dt: f32);
    fn is_active(&self) -> bool;
}

impl Transient for Projectile {
    fn advance(&mut self, dt: f32) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;

        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.active = false;
        }

        let w = PROJECTILE_WORLD;
        if self.x < w.x || self.x > w.x + w.w || self.y < w.y || self.y > w.y + w.h {
            self.active = false;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Transient for Particle {
    fn advance(&mut self, dt: f32) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.active = false;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Owned collection of transients.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool { items: Vec::new() }
    }
}

impl<T: Transient> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, item: T) {
        self.items.push(item);
    }

    /// Advance every entry, then drop the inactive ones.
    /// Returns how many were removed.
    pub fn update(&mut self, dt: f32) -> usize {
        for item in &mut self.items {
            item.advance(dt);
        }
        self.prune()
    }

    /// Drop inactive entries. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(Transient::is_active);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}
