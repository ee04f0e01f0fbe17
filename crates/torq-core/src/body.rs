// SPDX-License-Identifier: Apache-2.0
//! Rigid bodies: mass properties, pose, velocity state, cached transforms.

use std::fmt;
use std::sync::Arc;

use torq_math::{Aabb, Fx, Vec2};

use crate::collider::Shape;
use crate::diag::{Level, NullSink, SharedSink};
use crate::error::BodyError;
use crate::material::Material;

/// Unique identifier of a body within one [`crate::World`].
///
/// Assigned monotonically when the body is added; never reused. Pair keys in
/// the solver are ordered `(min_id, max_id)`, so id order is part of the
/// deterministic boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyId(pub(crate) u64);

impl BodyId {
    /// Raw numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Final pose handed to the step-over callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pose {
    /// World position.
    pub position: Vec2,
    /// Orientation in radians.
    pub angle: Fx,
}

/// Callback invoked once per [`crate::World::step`] after all solver
/// iterations, so callers can sync an external representation.
pub type StepOverFn = Box<dyn FnMut(BodyId, Pose)>;

/// Default static friction for the factory constructors.
fn default_static_friction() -> Fx {
    Fx::from_ratio(6, 10)
}

/// Default dynamic friction for the factory constructors.
fn default_dynamic_friction() -> Fx {
    Fx::from_ratio(4, 10)
}

/// A 2D rigid body with exactly one collider shape.
///
/// Created through [`Body::circle`] or [`Body::rect`]; admitted to a world
/// with [`crate::World::add_body`], which assigns the id and injects the
/// world's diagnostics sink.
pub struct Body {
    pub(crate) id: BodyId,
    name: String,
    is_static: bool,
    shape: Shape,
    material: Material,

    mass: Fx,
    inv_mass: Fx,
    inertia: Fx,
    inv_inertia: Fx,

    position: Vec2,
    angle: Fx,
    linear_velocity: Vec2,
    angular_velocity: Fx,
    force: Vec2,

    enable_rotation: bool,
    enable_gravity: bool,
    is_kinematic: bool,
    resolve_collision: bool,

    // Memoized world-space data, recomputed on read when dirty.
    transform_dirty: bool,
    aabb_dirty: bool,
    vertices_cache: [Vec2; 4],
    aabb_cache: Aabb,

    on_step_over: Option<StepOverFn>,
    sink: SharedSink,
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("is_static", &self.is_static)
            .field("shape", &self.shape)
            .field("position", &self.position)
            .field("angle", &self.angle)
            .finish_non_exhaustive()
    }
}

impl Body {
    fn new(
        name: String,
        shape: Shape,
        position: Vec2,
        density: Fx,
        is_static: bool,
        restitution: Fx,
    ) -> Result<Self, BodyError> {
        let material = Material::new(
            density,
            restitution,
            default_static_friction(),
            default_dynamic_friction(),
        )?;

        // Mass from area * density; static bodies are treated as infinitely
        // heavy (both inverses zero).
        let (mass, inertia) = if is_static {
            (Fx::ZERO, Fx::ZERO)
        } else {
            let mass = shape.area() * density;
            let inertia = match shape {
                Shape::Circle { radius } => Fx::HALF * mass * radius * radius,
                Shape::Rect { width, height } => {
                    mass * (width * width + height * height) / Fx::from_int(12)
                }
            };
            (mass, inertia)
        };
        let inv_mass = if mass.is_zero() { Fx::ZERO } else { Fx::ONE / mass };
        let inv_inertia = if inertia.is_zero() {
            Fx::ZERO
        } else {
            Fx::ONE / inertia
        };

        Ok(Self {
            id: BodyId(0),
            name,
            is_static,
            shape,
            material,
            mass,
            inv_mass,
            inertia,
            inv_inertia,
            position,
            angle: Fx::ZERO,
            linear_velocity: Vec2::ZERO,
            angular_velocity: Fx::ZERO,
            force: Vec2::ZERO,
            enable_rotation: true,
            enable_gravity: true,
            is_kinematic: false,
            resolve_collision: true,
            transform_dirty: true,
            aabb_dirty: true,
            vertices_cache: [Vec2::ZERO; 4],
            aabb_cache: Aabb::new(Vec2::ZERO, Vec2::ZERO),
            on_step_over: None,
            sink: Arc::new(NullSink),
        })
    }

    /// Creates a circle body. Mass and inertia derive from the shape area
    /// and `density` (`inertia = m*r^2/2`).
    pub fn circle(
        radius: Fx,
        position: Vec2,
        density: Fx,
        is_static: bool,
        restitution: Fx,
    ) -> Result<Self, BodyError> {
        Self::new(
            String::from("circle"),
            Shape::circle(radius)?,
            position,
            density,
            is_static,
            restitution,
        )
    }

    /// Creates a rectangle body. Mass and inertia derive from the shape area
    /// and `density` (`inertia = m*(w^2+h^2)/12`).
    pub fn rect(
        width: Fx,
        height: Fx,
        position: Vec2,
        density: Fx,
        is_static: bool,
        restitution: Fx,
    ) -> Result<Self, BodyError> {
        Self::new(
            String::from("rect"),
            Shape::rect(width, height)?,
            position,
            density,
            is_static,
            restitution,
        )
    }

    pub(crate) fn attach(&mut self, id: BodyId, sink: SharedSink) {
        self.id = id;
        self.sink = sink;
    }

    /// World-assigned identifier. Zero until the body is added to a world.
    #[must_use]
    pub const fn id(&self) -> BodyId {
        self.id
    }

    /// Human-readable name, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the diagnostic name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether the body is immovable.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    /// The collider shape.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// The material.
    #[must_use]
    pub const fn material(&self) -> &Material {
        &self.material
    }

    /// Mass (`0` for static bodies).
    #[must_use]
    pub const fn mass(&self) -> Fx {
        self.mass
    }

    /// Inverse mass (`0` means infinite).
    #[must_use]
    pub const fn inv_mass(&self) -> Fx {
        self.inv_mass
    }

    /// Rotational inertia (`0` for static bodies).
    #[must_use]
    pub const fn inertia(&self) -> Fx {
        self.inertia
    }

    /// Inverse rotational inertia (`0` means infinite).
    #[must_use]
    pub const fn inv_inertia(&self) -> Fx {
        self.inv_inertia
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Orientation in radians.
    #[must_use]
    pub const fn angle(&self) -> Fx {
        self.angle
    }

    /// Linear velocity.
    #[must_use]
    pub const fn linear_velocity(&self) -> Vec2 {
        self.linear_velocity
    }

    /// Angular velocity in radians per second.
    #[must_use]
    pub const fn angular_velocity(&self) -> Fx {
        self.angular_velocity
    }

    /// Force accumulated for the next integration step.
    #[must_use]
    pub const fn force(&self) -> Vec2 {
        self.force
    }

    /// Whether angular integration and angular impulses apply.
    #[must_use]
    pub const fn rotation_enabled(&self) -> bool {
        self.enable_rotation
    }

    /// Enables or disables rotation.
    pub fn set_rotation_enabled(&mut self, on: bool) {
        self.enable_rotation = on;
    }

    /// Whether world gravity applies.
    #[must_use]
    pub const fn gravity_enabled(&self) -> bool {
        self.enable_gravity
    }

    /// Enables or disables world gravity for this body.
    pub fn set_gravity_enabled(&mut self, on: bool) {
        self.enable_gravity = on;
    }

    /// Whether the body is kinematic: moved only by externally-set velocity,
    /// unaffected by forces and impulses, still pushes dynamic bodies.
    #[must_use]
    pub const fn is_kinematic(&self) -> bool {
        self.is_kinematic
    }

    /// Marks the body kinematic (or back to fully simulated).
    pub fn set_kinematic(&mut self, on: bool) {
        self.is_kinematic = on;
    }

    /// Whether the solver may act on collisions involving this body.
    #[must_use]
    pub const fn resolves_collision(&self) -> bool {
        self.resolve_collision
    }

    /// Opts the body in or out of collision resolution.
    pub fn set_resolve_collision(&mut self, on: bool) {
        self.resolve_collision = on;
    }

    /// Overrides the linear velocity directly (the kinematic driving seam).
    pub fn set_linear_velocity(&mut self, v: Vec2) {
        self.linear_velocity = v;
    }

    /// Overrides the angular velocity directly.
    pub fn set_angular_velocity(&mut self, w: Fx) {
        self.angular_velocity = w;
    }

    /// Registers the step-over callback.
    pub fn set_step_over<F>(&mut self, f: F)
    where
        F: FnMut(BodyId, Pose) + 'static,
    {
        self.on_step_over = Some(Box::new(f));
    }

    /// Clears the step-over callback.
    pub fn clear_step_over(&mut self) {
        self.on_step_over = None;
    }

    fn mark_moved(&mut self) {
        self.transform_dirty = true;
        self.aabb_dirty = true;
    }

    /// Translates by `delta`.
    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
        self.mark_moved();
    }

    /// Teleports to `position`.
    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
        self.mark_moved();
    }

    /// Rotates by `delta` radians.
    pub fn rotate_by(&mut self, delta: Fx) {
        self.angle += delta;
        self.mark_moved();
    }

    /// Sets the orientation to `angle` radians.
    pub fn rotate_to(&mut self, angle: Fx) {
        self.angle = angle;
        self.mark_moved();
    }

    /// Accumulates a force for the next integration step.
    ///
    /// Silently ignored on static bodies. On kinematic bodies the force is
    /// still recorded but a warning is reported: kinematic motion ignores
    /// forces, so the call is almost certainly a caller bug.
    pub fn add_force(&mut self, amount: Vec2) {
        if self.is_static {
            return;
        }
        if self.is_kinematic {
            self.sink.report(
                Level::Warn,
                "force_on_kinematic",
                &format!("add_force on kinematic body {}", self.id),
            );
        }
        self.force += amount;
    }

    /// Accumulates an impulse, scaled through the mass so it lands as a
    /// velocity change at the next integration step.
    ///
    /// Silently ignored on static bodies; warns on kinematic bodies like
    /// [`Body::add_force`].
    pub fn add_impulse(&mut self, amount: Vec2) {
        if self.is_static {
            return;
        }
        if self.is_kinematic {
            self.sink.report(
                Level::Warn,
                "impulse_on_kinematic",
                &format!("add_impulse on kinematic body {}", self.id),
            );
        }
        self.force += amount / self.inv_mass;
    }

    /// Integrates one sub-step of `dt / iterations`.
    ///
    /// Static bodies never integrate. Kinematic bodies integrate position
    /// from their externally-set velocity but ignore accumulated force.
    pub(crate) fn integrate(&mut self, gravity: Vec2, dt: Fx, iterations: i64) {
        if self.is_static {
            return;
        }
        let sub_dt = dt / Fx::from_int(iterations);

        if !self.is_kinematic {
            if self.enable_gravity {
                self.linear_velocity += gravity * sub_dt;
            }
            self.linear_velocity += self.force * self.inv_mass * sub_dt;
            if self.enable_rotation {
                self.angle += self.angular_velocity * sub_dt;
            }
        }

        self.position += self.linear_velocity * sub_dt;
        self.force = Vec2::ZERO;
        self.mark_moved();
    }

    /// Applies a solver impulse at lever arm `r` from the center of mass.
    /// No-op for kinematic bodies; angular response requires rotation to be
    /// enabled.
    pub(crate) fn apply_impulse_at(&mut self, impulse: Vec2, r: Vec2) {
        if self.is_kinematic {
            return;
        }
        self.linear_velocity += impulse * self.inv_mass;
        if self.enable_rotation {
            self.angular_velocity += r.cross(impulse) * self.inv_inertia;
        }
    }

    /// World-space corners of a rectangle body, memoized until the body
    /// moves or rotates. `None` for circles.
    pub fn world_vertices(&mut self) -> Option<[Vec2; 4]> {
        let local = self.shape.local_vertices()?;
        if self.transform_dirty {
            let (sin, cos) = self.angle.sin_cos();
            for (slot, v) in self.vertices_cache.iter_mut().zip(local) {
                *slot = Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos) + self.position;
            }
            self.transform_dirty = false;
        }
        Some(self.vertices_cache)
    }

    /// World-space AABB, memoized until the body moves or rotates.
    pub fn aabb(&mut self) -> Aabb {
        if self.aabb_dirty {
            self.aabb_cache = match self.shape {
                Shape::Circle { radius } => {
                    Aabb::from_center_half_extents(self.position, radius, radius)
                }
                Shape::Rect { .. } => {
                    // world_vertices clears transform_dirty as a side effect.
                    let position = self.position;
                    let verts = self.world_vertices().unwrap_or([position; 4]);
                    let mut min = verts[0];
                    let mut max = verts[0];
                    for v in &verts[1..] {
                        min = Vec2::new(min.x.min(v.x), min.y.min(v.y));
                        max = Vec2::new(max.x.max(v.x), max.y.max(v.y));
                    }
                    Aabb::new(min, max)
                }
            };
            self.aabb_dirty = false;
        }
        self.aabb_cache
    }

    /// Fires the step-over callback, if registered.
    pub(crate) fn fire_step_over(&mut self) {
        let pose = Pose {
            position: self.position,
            angle: self.angle,
        };
        let id = self.id;
        if let Some(cb) = self.on_step_over.as_mut() {
            cb(id, pose);
        }
    }

    /// Replaces the restitution, reporting and retaining the previous value
    /// if `v` is out of range.
    pub fn set_restitution(&mut self, v: Fx) {
        if let Err(err) = self.material.try_set_restitution(v) {
            self.sink
                .report(Level::Error, "bad_restitution", &err.to_string());
        }
    }

    /// Replaces the static friction, reporting and retaining on rejection.
    pub fn set_static_friction(&mut self, v: Fx) {
        if let Err(err) = self.material.try_set_static_friction(v) {
            self.sink
                .report(Level::Error, "bad_friction", &err.to_string());
        }
    }

    /// Replaces the dynamic friction, reporting and retaining on rejection.
    pub fn set_dynamic_friction(&mut self, v: Fx) {
        if let Err(err) = self.material.try_set_dynamic_friction(v) {
            self.sink
                .report(Level::Error, "bad_friction", &err.to_string());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn box_mass_and_inertia_derivation() {
        // 2x3 box, density d: mass = 6d, inertia = 6d*(4+9)/12 = 6.5d.
        let d = Fx::TWO;
        let b = Body::rect(
            Fx::from_int(2),
            Fx::from_int(3),
            Vec2::ZERO,
            d,
            false,
            Fx::HALF,
        )
        .unwrap();
        assert_eq!(b.mass(), Fx::from_int(6) * d);
        assert_eq!(b.inertia(), Fx::from_ratio(13, 2) * d);
        assert_eq!(b.inv_mass(), Fx::ONE / (Fx::from_int(6) * d));
    }

    #[test]
    fn static_body_has_zero_inverse_mass() {
        let b = Body::circle(Fx::ONE, Vec2::ZERO, Fx::ONE, true, Fx::ZERO).unwrap();
        assert_eq!(b.mass(), Fx::ZERO);
        assert_eq!(b.inv_mass(), Fx::ZERO);
        assert_eq!(b.inv_inertia(), Fx::ZERO);
    }

    #[test]
    fn static_body_ignores_forces_and_integration() {
        let mut b = Body::circle(Fx::ONE, Vec2::from_int(3, 4), Fx::ONE, true, Fx::ZERO).unwrap();
        b.add_force(Vec2::from_int(100, 0));
        assert_eq!(b.force(), Vec2::ZERO);
        b.integrate(Vec2::from_int(0, -10), Fx::ONE, 1);
        assert_eq!(b.position(), Vec2::from_int(3, 4));
        assert_eq!(b.linear_velocity(), Vec2::ZERO);
    }

    #[test]
    fn force_integrates_into_velocity() {
        let mut b = Body::circle(Fx::ONE, Vec2::ZERO, Fx::ONE, false, Fx::ZERO).unwrap();
        b.set_gravity_enabled(false);
        b.add_force(Vec2::new(b.mass(), Fx::ZERO)); // unit acceleration
        b.integrate(Vec2::ZERO, Fx::ONE, 1);
        let vx = b.linear_velocity().x.to_f32();
        assert!((vx - 1.0).abs() < 1e-5, "vx = {vx}");
        assert_eq!(b.force(), Vec2::ZERO, "force resets after integration");
    }

    #[test]
    fn kinematic_body_moves_by_velocity_only() {
        let mut b = Body::circle(Fx::ONE, Vec2::ZERO, Fx::ONE, false, Fx::ZERO).unwrap();
        b.set_kinematic(true);
        b.set_linear_velocity(Vec2::from_int(2, 0));
        b.add_force(Vec2::from_int(0, 100));
        b.integrate(Vec2::from_int(0, -10), Fx::ONE, 1);
        assert_eq!(b.position(), Vec2::from_int(2, 0));
        assert_eq!(b.linear_velocity(), Vec2::from_int(2, 0));
    }

    #[test]
    fn unrotated_rect_vertices_are_exact() {
        let mut b = Body::rect(
            Fx::TWO,
            Fx::TWO,
            Vec2::from_int(3, 4),
            Fx::ONE,
            false,
            Fx::ZERO,
        )
        .unwrap();
        let v = b.world_vertices().unwrap();
        assert_eq!(
            v,
            [
                Vec2::from_int(2, 3),
                Vec2::from_int(4, 3),
                Vec2::from_int(4, 5),
                Vec2::from_int(2, 5),
            ]
        );
    }

    #[test]
    fn aabb_of_rotated_rect_expands() {
        let mut b = Body::rect(Fx::TWO, Fx::TWO, Vec2::ZERO, Fx::ONE, false, Fx::ZERO).unwrap();
        let axis_aligned = b.aabb();
        assert_eq!(axis_aligned.min(), Vec2::from_int(-1, -1));
        assert_eq!(axis_aligned.max(), Vec2::from_int(1, 1));

        b.rotate_to(Fx::FRAC_PI_2 * Fx::HALF); // 45 degrees
        let rotated = b.aabb();
        assert!(rotated.max().x > axis_aligned.max().x);
    }

    #[test]
    fn aabb_cache_invalidated_by_moves() {
        let mut b = Body::circle(Fx::ONE, Vec2::ZERO, Fx::ONE, false, Fx::ZERO).unwrap();
        let before = b.aabb();
        b.move_by(Vec2::from_int(5, 0));
        let after = b.aabb();
        assert_eq!(after.min().x, before.min().x + Fx::from_int(5));
    }
}
