use glam::{Mat4, Vec3};

/// Axis-aligned box with closed bounds. Boxes that only touch intersect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |b, p| b.including(p))
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn including(self, point: Vec3) -> Self {
        Self::new(self.min.min(point), self.max.max(point))
    }

    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Re-box the eight transformed corners. The result encloses the rotated box.
    pub fn transformed(&self, transform: Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::from_points(self.corners().map(|c| transform.transform_point3(c)))
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

/// An obstacle from the loaded scene. The local box is computed once from
/// geometry; the world box is derived from it on every query.
#[derive(Debug, Clone)]
pub struct ObstacleCollider {
    pub name: String,
    pub local_bounds: Aabb,
    pub transform: Mat4,
}

impl ObstacleCollider {
    pub fn new(name: impl Into<String>, local_bounds: Aabb, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            local_bounds,
            transform,
        }
    }

    /// Collider whose local box is already in world space.
    #[cfg(test)]
    pub fn fixed(name: impl Into<String>, world_bounds: Aabb) -> Self {
        Self::new(name, world_bounds, Mat4::IDENTITY)
    }

    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.transformed(self.transform)
    }
}

/// Index of the first obstacle (insertion order) whose world box intersects `bounds`.
pub fn first_contact(bounds: &Aabb, obstacles: &[ObstacleCollider]) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| bounds.intersects(&o.world_bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let other = Aabb::new(Vec3::new(2.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0));
        assert!(!unit_box().intersects(&other));
        assert!(!other.intersects(&unit_box()));
    }

    #[test]
    fn separation_on_one_axis_is_enough() {
        // Overlaps on x and y, separated on z.
        let other = Aabb::new(Vec3::new(0.0, 0.0, 1.5), Vec3::new(0.5, 0.5, 2.0));
        assert!(!unit_box().intersects(&other));
    }

    #[test]
    fn touching_boxes_intersect() {
        let face = Aabb::new(Vec3::new(1.0, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0));
        let corner = Aabb::new(Vec3::splat(1.0), Vec3::splat(2.0));
        assert!(unit_box().intersects(&face));
        assert!(face.intersects(&unit_box()));
        assert!(unit_box().intersects(&corner));
    }

    #[test]
    fn overlapping_and_contained_boxes_intersect() {
        let partial = Aabb::new(Vec3::splat(0.5), Vec3::splat(1.5));
        let inner = Aabb::new(Vec3::splat(-0.1), Vec3::splat(0.1));
        assert!(unit_box().intersects(&partial));
        assert!(unit_box().intersects(&inner));
        assert!(inner.intersects(&unit_box()));
    }

    #[test]
    fn rotated_box_grows_to_enclose_corners() {
        let rot = Mat4::from_quat(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4));
        let b = unit_box().transformed(rot);
        let diag = 2.0_f32.sqrt();
        assert!((b.max.x - diag).abs() < 1e-5);
        assert!((b.max.z - diag).abs() < 1e-5);
        assert!((b.max.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn world_bounds_follow_transform() {
        let collider = ObstacleCollider::new(
            "Column.001",
            unit_box(),
            Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)),
        );
        let b = collider.world_bounds();
        assert_eq!(b.min, Vec3::new(4.0, -1.0, -1.0));
        assert_eq!(b.max, Vec3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn first_contact_respects_insertion_order() {
        let probe = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        let obstacles = vec![
            ObstacleCollider::fixed("far", Aabb::new(Vec3::splat(10.0), Vec3::splat(11.0))),
            ObstacleCollider::fixed("a", unit_box()),
            ObstacleCollider::fixed("b", unit_box()),
        ];
        assert_eq!(first_contact(&probe, &obstacles), Some(1));
        assert_eq!(first_contact(&probe, &[]), None);
    }

    #[test]
    fn empty_box_survives_transform() {
        let b = Aabb::EMPTY.transformed(Mat4::from_translation(Vec3::ONE));
        assert!(b.is_empty());
    }
}
