// SPDX-License-Identifier: Apache-2.0
//! The physics world: body collection, step loop, impulse solver.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use torq_math::{Fx, Vec2};

use crate::body::{Body, BodyId};
use crate::broad::{self, Proxy};
use crate::diag::{NullSink, SharedSink};
use crate::grid::{GridConfig, SpatialGrid};
use crate::manifold::Manifold;
use crate::narrow;

/// Smallest accepted sub-step count.
pub const MIN_ITERATIONS: i64 = 1;
/// Largest accepted sub-step count.
pub const MAX_ITERATIONS: i64 = 40;

/// How two bodies' material coefficients combine at a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombineRule {
    /// Take the smaller coefficient.
    Min,
    /// Take the larger coefficient.
    Max,
    /// Take the mean of both coefficients.
    #[default]
    Average,
}

impl CombineRule {
    /// Combines two coefficients under this rule.
    #[must_use]
    pub fn combine(self, a: Fx, b: Fx) -> Fx {
        match self {
            Self::Min => a.min(b),
            Self::Max => a.max(b),
            Self::Average => (a + b) * Fx::HALF,
        }
    }
}

/// Construction parameters for a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldDef {
    /// Gravitational acceleration applied to gravity-enabled bodies.
    pub gravity: Vec2,
    /// Combination rule for restitution.
    pub restitution_rule: CombineRule,
    /// Combination rule for both friction coefficients.
    pub friction_rule: CombineRule,
    /// Optional broad-phase grid; without one, pairing is O(n^2).
    pub grid: Option<GridConfig>,
}

impl Default for WorldDef {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(Fx::ZERO, Fx::from_ratio(-981, 100)),
            restitution_rule: CombineRule::Average,
            friction_rule: CombineRule::Average,
            grid: None,
        }
    }
}

/// Solver-private scratch, reused across contacts within one step.
/// Fixed length two because a manifold never carries more contact points.
#[derive(Debug, Default, Clone, Copy)]
struct SolverScratch {
    contact: [Vec2; 2],
    ra: [Vec2; 2],
    rb: [Vec2; 2],
    impulse: [Vec2; 2],
    friction_impulse: [Vec2; 2],
    j: [Fx; 2],
}

/// A deterministic 2D rigid-body world.
///
/// Owns every body; drives the step loop (integrate, broad phase, narrow
/// phase, separate, resolve). Not safe for concurrent stepping: one world,
/// one logical thread.
pub struct World {
    gravity: Vec2,
    restitution_rule: CombineRule,
    friction_rule: CombineRule,

    bodies: Vec<Body>,
    index_of: FxHashMap<BodyId, usize>,
    grid: Option<SpatialGrid>,
    next_id: u64,
    sink: SharedSink,

    contacts: Vec<Manifold>,
    scratch: SolverScratch,
    query_scratch: Vec<BodyId>,
}

impl World {
    /// Creates a world with a discarding diagnostics sink.
    #[must_use]
    pub fn new(def: WorldDef) -> Self {
        Self::with_sink(def, Arc::new(NullSink))
    }

    /// Creates a world reporting diagnostics through `sink`. The sink is
    /// shared with every body added afterwards.
    #[must_use]
    pub fn with_sink(def: WorldDef, sink: SharedSink) -> Self {
        Self {
            gravity: def.gravity,
            restitution_rule: def.restitution_rule,
            friction_rule: def.friction_rule,
            bodies: Vec::new(),
            index_of: FxHashMap::default(),
            grid: def.grid.map(SpatialGrid::new),
            next_id: 1,
            sink,
            contacts: Vec::new(),
            scratch: SolverScratch::default(),
            query_scratch: Vec::new(),
        }
    }

    /// Gravitational acceleration.
    #[must_use]
    pub const fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns `true` when the world holds no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Admits a body, assigning it the next id and the world's sink.
    pub fn add_body(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.attach(id, Arc::clone(&self.sink));
        if let Some(grid) = self.grid.as_mut() {
            grid.insert(id, body.position(), body.shape().bounding_extent());
        }
        self.index_of.insert(id, self.bodies.len());
        self.bodies.push(body);
        id
    }

    /// Removes a body, detaching it from the grid. Returns the body, or
    /// `None` for an unknown id. Insertion order of the remaining bodies is
    /// preserved.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.index_of.remove(&id)?;
        if let Some(grid) = self.grid.as_mut() {
            grid.remove(id);
        }
        let body = self.bodies.remove(idx);
        for (i, b) in self.bodies.iter().enumerate().skip(idx) {
            self.index_of.insert(b.id(), i);
        }
        Some(body)
    }

    /// Body lookup by id.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.index_of.get(&id).map(|&i| &self.bodies[i])
    }

    /// Mutable body lookup by id. Positions changed through this handle are
    /// re-bucketed in the grid at the start of the next step.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of.get(&id).map(|&i| &mut self.bodies[i])
    }

    /// Body lookup by insertion index.
    #[must_use]
    pub fn body_at(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    /// Iterates bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub(crate) fn bodies_by_id(&self) -> Vec<&Body> {
        let mut refs: Vec<&Body> = self.bodies.iter().collect();
        refs.sort_unstable_by_key(|b| b.id());
        refs
    }

    /// Contact manifolds produced by the final sub-step of the last
    /// [`World::step`] call.
    #[must_use]
    pub fn contacts(&self) -> &[Manifold] {
        &self.contacts
    }

    /// Advances the simulation by `dt`, split into `iterations` sub-steps
    /// (clamped to `[MIN_ITERATIONS, MAX_ITERATIONS]`). After all sub-steps
    /// every body's step-over callback fires once.
    pub fn step(&mut self, dt: Fx, iterations: i64) {
        let iterations = iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        for _ in 0..iterations {
            self.sub_step(dt, iterations);
        }
        for body in &mut self.bodies {
            body.fire_step_over();
        }
    }

    fn sub_step(&mut self, dt: Fx, iterations: i64) {
        self.contacts.clear();

        for body in &mut self.bodies {
            body.integrate(self.gravity, dt, iterations);
        }
        if let Some(grid) = self.grid.as_mut() {
            for body in &self.bodies {
                grid.update(body.id(), body.position());
            }
        }

        let proxies: Vec<Proxy> = self
            .bodies
            .iter_mut()
            .map(|b| Proxy {
                id: b.id(),
                position: b.position(),
                aabb: b.aabb(),
                is_static: b.is_static(),
                solid: b.resolves_collision(),
            })
            .collect();
        let pairs = broad::candidate_pairs(
            &proxies,
            &self.index_of,
            self.grid.as_ref(),
            &mut self.query_scratch,
        );

        for (a_id, b_id) in pairs {
            let (Some(&ia), Some(&ib)) = (self.index_of.get(&a_id), self.index_of.get(&b_id))
            else {
                continue;
            };
            let (a, b) = pair_mut(&mut self.bodies, ia, ib);
            let Some(contact) = narrow::collide(a, b) else {
                continue;
            };

            separate(a, b, contact.normal * contact.depth);
            if a.is_kinematic() && b.is_kinematic() {
                continue;
            }

            let (c1, c2, count) = narrow::find_contact_points(a, b);
            if count == 0 {
                continue;
            }
            self.contacts.push(Manifold {
                a: a_id,
                b: b_id,
                normal: contact.normal,
                depth: contact.depth,
                contact1: c1,
                contact2: c2,
                contact_count: count,
            });

            self.scratch.contact = [c1, c2];
            let e = self
                .restitution_rule
                .combine(a.material().restitution(), b.material().restitution());
            let sf = self
                .friction_rule
                .combine(a.material().static_friction(), b.material().static_friction());
            let df = self.friction_rule.combine(
                a.material().dynamic_friction(),
                b.material().dynamic_friction(),
            );
            resolve(a, b, contact.normal, count, e, sf, df, &mut self.scratch);
        }
    }
}

/// Disjoint mutable borrows of two bodies by index.
fn pair_mut(bodies: &mut [Body], ia: usize, ib: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(ia, ib);
    if ia < ib {
        let (left, right) = bodies.split_at_mut(ib);
        (&mut left[ia], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(ia);
        let (b, a) = (&mut left[ib], &mut right[0]);
        (a, b)
    }
}

/// Pushes the bodies out of penetration along `sv = normal * depth`
/// (normal points A to B).
///
/// A static or currently-motionless body stays put and the other body takes
/// the full displacement; otherwise the displacement splits evenly.
fn separate(a: &mut Body, b: &mut Body, sv: Vec2) {
    if a.is_static() || a.linear_velocity().is_zero() {
        b.move_by(sv);
    } else if b.is_static() || b.linear_velocity().is_zero() {
        a.move_by(-sv);
    } else {
        let half = sv * Fx::HALF;
        a.move_by(-half);
        b.move_by(half);
    }
}

/// Sequential-impulse resolution with rotation and Coulomb friction.
///
/// Two passes over the (up to two) contact points: normal impulses from the
/// pre-impulse velocities, then friction impulses from the updated
/// velocities, each divided by the contact count so a two-point manifold
/// carries the same total impulse as a one-point one.
#[allow(clippy::too_many_arguments, clippy::needless_range_loop)]
fn resolve(
    a: &mut Body,
    b: &mut Body,
    normal: Vec2,
    count: u8,
    e: Fx,
    sf: Fx,
    df: Fx,
    s: &mut SolverScratch,
) {
    let count = usize::from(count.min(2));
    let count_fx = Fx::from_int(count as i64);

    for i in 0..count {
        s.ra[i] = s.contact[i] - a.position();
        s.rb[i] = s.contact[i] - b.position();
        s.impulse[i] = Vec2::ZERO;
        s.friction_impulse[i] = Vec2::ZERO;
        s.j[i] = Fx::ZERO;
    }

    for i in 0..count {
        let ra_perp = s.ra[i].perp();
        let rb_perp = s.rb[i].perp();
        let rel = (b.linear_velocity() + rb_perp * b.angular_velocity())
            - (a.linear_velocity() + ra_perp * a.angular_velocity());
        let contact_vel = rel.dot(normal);
        if contact_vel > Fx::ZERO {
            // Already separating at this point.
            continue;
        }
        let ra_perp_n = ra_perp.dot(normal);
        let rb_perp_n = rb_perp.dot(normal);
        let denom = a.inv_mass()
            + b.inv_mass()
            + ra_perp_n * ra_perp_n * a.inv_inertia()
            + rb_perp_n * rb_perp_n * b.inv_inertia();
        let j = -(Fx::ONE + e) * contact_vel / denom / count_fx;
        s.j[i] = j;
        s.impulse[i] = normal * j;
    }
    for i in 0..count {
        let impulse = s.impulse[i];
        a.apply_impulse_at(-impulse, s.ra[i]);
        b.apply_impulse_at(impulse, s.rb[i]);
    }

    // Friction from the post-impulse velocities.
    for i in 0..count {
        let ra_perp = s.ra[i].perp();
        let rb_perp = s.rb[i].perp();
        let rel = (b.linear_velocity() + rb_perp * b.angular_velocity())
            - (a.linear_velocity() + ra_perp * a.angular_velocity());
        let tangent = rel - normal * rel.dot(normal);
        if tangent.is_zero() {
            continue;
        }
        let tangent = tangent.normalize();
        let ra_perp_t = ra_perp.dot(tangent);
        let rb_perp_t = rb_perp.dot(tangent);
        let denom = a.inv_mass()
            + b.inv_mass()
            + ra_perp_t * ra_perp_t * a.inv_inertia()
            + rb_perp_t * rb_perp_t * b.inv_inertia();
        let jt = -rel.dot(tangent) / denom / count_fx;
        // Coulomb: static friction holds until the tangential impulse
        // exceeds j*sf, then dynamic friction applies.
        s.friction_impulse[i] = if jt.abs() <= s.j[i] * sf {
            tangent * jt
        } else {
            tangent * (-s.j[i] * df)
        };
    }
    for i in 0..count {
        let impulse = s.friction_impulse[i];
        a.apply_impulse_at(-impulse, s.ra[i]);
        b.apply_impulse_at(impulse, s.rb[i]);
    }
}
