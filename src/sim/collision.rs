/// Projectile-vs-collidable pass.
///
/// Runs once per frame after the camera update. It reports every
/// overlapping (projectile, target) pair and changes nothing: hits do not
/// deactivate projectiles or touch health. The target set is the enemy
/// list, which nothing populates yet.

use crate::domain::entity::{Enemy, Projectile};
use crate::domain::physics::Rect;

pub trait Collidable {
    fn bounds(&self) -> Rect;
}

impl Collidable for Enemy {
    fn bounds(&self) -> Rect {
        self.area
    }
}

/// One overlapping pair, by index into the two input slices.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Contact {
    pub projectile: usize,
    pub target: usize,
}

pub fn find_contacts<C: Collidable>(projectiles: &[Projectile], targets: &[C]) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for (pi, p) in projectiles.iter().enumerate() {
        if !p.active { continue; }
        let pb = p.bounds();
        for (ti, t) in targets.iter().enumerate() {
            if pb.overlaps(&t.bounds()) {
                contacts.push(Contact { projectile: pi, target: ti });
            }
        }
    }
    contacts
}
