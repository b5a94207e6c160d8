//! Quaternion plumbing for the retargeting transform.
//!
//! The animation format stores, for each joint, the rotation it has in the
//! avatar's own frame. BVH channels want the rotation in the joint's
//! authoring frame, decomposed into Euler angles in that joint's channel
//! order. Each joint carries a fixed frame matrix and an offset matrix; the
//! encoder applied
//!
//!     out = offset · frame · in · frame⁻¹
//!
//! (Hamilton products, rightmost applied first), so decoding runs it
//! backwards.
//!
//! Matrices in the joint table are written the way the avatar rig writes
//! them: row-vector matrices, `v' = v M`. cgmath is column-major with column
//! vectors, so passing the rows straight into `Matrix3::new` yields exactly
//! the transpose we need.

use cgmath::{Deg, InnerSpace, Matrix3, Quaternion, Rad, Rotation3, Vector3, vec3};

/// Euler composition orders supported by the rig's channel layouts. The
/// name lists the axes in BVH channel order; `XZY` means the rotation is
/// `Rx · Rz · Ry`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RotationOrder {
    ZYX,
    XZY,
    YZX,
    XYZ,
}

impl RotationOrder {
    /// Component indices (0 = X, 1 = Y, 2 = Z) in channel order.
    pub fn axes(self) -> [usize; 3] {
        match self {
            RotationOrder::ZYX => [2, 1, 0],
            RotationOrder::XZY => [0, 2, 1],
            RotationOrder::YZX => [1, 2, 0],
            RotationOrder::XYZ => [0, 1, 2],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RotationOrder::ZYX => "ZYX",
            RotationOrder::XZY => "XZY",
            RotationOrder::YZX => "YZX",
            RotationOrder::XYZ => "XYZ",
        }
    }
}

/// The rotation a row-vector matrix performs.
pub fn matrix_rotation(m: Matrix3<f64>) -> Quaternion<f64> {
    Quaternion::from(m).normalize()
}

/// Rebuilds a unit quaternion from its vector part. The scalar part is
/// implied non-negative.
pub fn unpack_from_vector3(v: Vector3<f64>) -> Quaternion<f64> {
    let t = 1.0 - v.magnitude2();
    let w = if t > 0.0 { t.sqrt() } else { 0.0 };
    Quaternion::from_sv(w, v)
}

/// Drops the scalar part of a unit quaternion, flipping the sign first so
/// that `unpack_from_vector3` gets back the same rotation.
#[cfg(test)]
pub fn pack_to_vector3(q: Quaternion<f64>) -> Vector3<f64> {
    if q.s < 0.0 { -q.v } else { q.v }
}

/// Maps a rotation in the joint's authoring frame to the stored rotation.
#[cfg(test)]
pub fn retarget(in_rot: Quaternion<f64>, frame_rot: Quaternion<f64>, offset_rot: Quaternion<f64>) -> Quaternion<f64> {
    offset_rot * frame_rot * in_rot * frame_rot.conjugate()
}

/// Inverse of `retarget`.
pub fn unretarget(out_rot: Quaternion<f64>, frame_rot: Quaternion<f64>, offset_rot: Quaternion<f64>) -> Quaternion<f64> {
    frame_rot.conjugate() * offset_rot.conjugate() * out_rot * frame_rot
}

/// Closed-form decomposition of `q = q_a(t1) q_b(t2) q_c(t3)`, where
/// `(p0, p1, p2, p3)` are the scalar part and the `a`, `b`, `c` components
/// of the vector part. `e` is +1 when `abc` is a cyclic permutation of
/// `xyz` and -1 otherwise. Returns `[t1, t2, t3]` in degrees.
pub fn rev_q(p0: f64, p1: f64, p2: f64, p3: f64, e: f64) -> [f64; 3] {
    let sint2 = 2.0 * (p0 * p2 + e * p1 * p3);

    let (t1, t2, t3) = if sint2.abs() > 0.9999995 {
        // Gimbal lock: t1 and t3 turn about the same axis. Put it all in t1.
        // atan2(p1, p0) sees the sign of q, so take the w >= 0 one of q, -q.
        let (p0, p1) = if p0 < 0.0 { (-p0, -p1) } else { (p0, p1) };
        let t2 = if sint2 < 0.0 { (-1.0f64).asin() } else { 1.0f64.asin() };
        (p1.atan2(p0), t2, 0.0)
    } else {
        let t1 = (2.0 * (p0 * p1 - e * p2 * p3)).atan2(1.0 - 2.0 * (p1 * p1 + p2 * p2));
        let t3 = (2.0 * (p0 * p3 - e * p1 * p2)).atan2(1.0 - 2.0 * (p2 * p2 + p3 * p3));
        (t1, sint2.asin(), t3)
    };

    [t1.to_degrees(), t2.to_degrees(), t3.to_degrees()]
}

/// Euler angles (X, Y, Z components, degrees) of `q` in the given order.
pub fn to_euler(q: Quaternion<f64>, order: RotationOrder) -> Vector3<f64> {
    let (w, x, y, z) = (q.s, q.v.x, q.v.y, q.v.z);
    match order {
        RotationOrder::ZYX => {
            let t = rev_q(w, z, y, x, -1.0);
            vec3(t[2], t[1], t[0])
        }
        RotationOrder::XZY => {
            let t = rev_q(w, x, z, y, -1.0);
            vec3(t[0], t[2], t[1])
        }
        RotationOrder::YZX => {
            let t = rev_q(w, y, z, x, 1.0);
            vec3(t[2], t[0], t[1])
        }
        RotationOrder::XYZ => {
            let t = rev_q(w, x, y, z, 1.0);
            vec3(t[0], t[1], t[2])
        }
    }
}

/// Composes Euler angles (X, Y, Z components, degrees) in the given order.
/// Used for offsets given on the command line.
pub fn from_euler(angles: Vector3<f64>, order: RotationOrder) -> Quaternion<f64> {
    let axis_rot = |axis: usize| -> Quaternion<f64> {
        let angle = Rad::from(Deg(angles[axis]));
        match axis {
            0 => Quaternion::from_angle_x(angle),
            1 => Quaternion::from_angle_y(angle),
            _ => Quaternion::from_angle_z(angle),
        }
    };
    let [a, b, c] = order.axes();
    axis_rot(a) * axis_rot(b) * axis_rot(c)
}

/// Spherical interpolation along the shorter arc. The result may have the
/// opposite sign to `to`; `to_euler` doesn't care.
pub fn slerp(from: Quaternion<f64>, to: Quaternion<f64>, t: f64) -> Quaternion<f64> {
    let to = if from.dot(to) < 0.0 { -to } else { to };
    from.slerp(to, t).normalize()
}

/// Angle in degrees between the rotations `a` and `b`.
#[cfg(test)]
pub fn angle_between(a: Quaternion<f64>, b: Quaternion<f64>) -> f64 {
    let d = a.dot(b).abs().min(1.0);
    (2.0 * d.acos()).to_degrees()
}

#[cfg(test)]
static ORDERS: [RotationOrder; 4] = [
    RotationOrder::ZYX, RotationOrder::XZY, RotationOrder::YZX, RotationOrder::XYZ,
];

#[cfg(test)]
fn rig_frame() -> Quaternion<f64> {
    matrix_rotation(::skeleton::rig_frame_matrix())
}

#[cfg(test)]
fn assert_angles_close(a: Vector3<f64>, b: Vector3<f64>) {
    for i in 0..3 {
        assert!((a[i] - b[i]).abs() < 1e-4, "{:?} != {:?}", a, b);
    }
}

#[test]
fn test_frame_matrix_permutes_axes() {
    // v' = v M with the rig's frame sends x to y, y to z, z to x.
    let q = rig_frame();
    let v = q * vec3(1.0, 0.0, 0.0);
    assert!((v - vec3(0.0, 1.0, 0.0)).magnitude() < 1e-12);
    let v = q * vec3(0.0, 0.0, 1.0);
    assert!((v - vec3(1.0, 0.0, 0.0)).magnitude() < 1e-12);
}

#[test]
fn test_rest_pose_round_trip() {
    use cgmath::One;
    let frame = rig_frame();
    for &order in &ORDERS {
        let out = retarget(Quaternion::one(), frame, Quaternion::one());
        let back = unretarget(out, frame, Quaternion::one());
        assert_angles_close(to_euler(back, order), vec3(0.0, 0.0, 0.0));
    }
}

#[test]
fn test_posed_round_trip() {
    let frame = rig_frame();
    let offset = Quaternion::from_angle_y(Deg(15.0));
    let poses = [
        vec3(30.0, -20.0, 45.0),
        vec3(-70.0, 10.0, 5.0),
        vec3(100.0, 60.0, -75.0),
    ];
    for &order in &ORDERS {
        for &pose in &poses {
            let in_rot = from_euler(pose, order);
            let out = retarget(in_rot, frame, offset);
            // The stored form only keeps the vector part.
            let out = unpack_from_vector3(pack_to_vector3(out));
            let back = unretarget(out, frame, offset);
            assert_angles_close(to_euler(back, order), pose);
        }
    }
}

#[test]
fn test_single_axis_lands_in_its_channel() {
    let q = Quaternion::from_angle_z(Deg(40.0));
    for &order in &ORDERS {
        assert_angles_close(to_euler(q, order), vec3(0.0, 0.0, 40.0));
    }
}

#[test]
fn test_gimbal_lock_is_finite() {
    // s = 2(p0 p2 + e p1 p3) = 2(0.5 * 0.5 + 0.5 * 0.5) = 1 exactly.
    let t = rev_q(0.5, 0.5, 0.5, 0.5, 1.0);
    assert!(t.iter().all(|x| x.is_finite()));
    assert_eq!(t[2], 0.0);
    assert_eq!(t[0], 0.5f64.atan2(0.5).to_degrees());
    assert!((t[1] - 90.0).abs() < 1e-9);

    let t = rev_q(0.5, -0.5, -0.5, 0.5, 1.0);
    assert!(t.iter().all(|x| x.is_finite()));
    assert_eq!(t[2], 0.0);
    assert_eq!(t[0], (-0.5f64).atan2(0.5).to_degrees());
    assert!((t[1] + 90.0).abs() < 1e-9);
}

#[test]
fn test_gimbal_lock_ignores_quaternion_sign() {
    assert_eq!(rev_q(-0.5, -0.5, -0.5, -0.5, 1.0), rev_q(0.5, 0.5, 0.5, 0.5, 1.0));

    // An interpolated frame may come out of slerp as -q; it must still
    // decompose like the keyed q.
    let q = Quaternion::new(0.5, 0.5, 0.5, 0.5);
    for &order in &ORDERS {
        assert_eq!(to_euler(-q, order), to_euler(q, order));
    }
    let from = Quaternion::new(-0.5, -0.5, -0.5, -0.5);
    let mid = slerp(from, q, 0.5);
    assert!(mid.s < 0.0);
    assert_angles_close(to_euler(mid, RotationOrder::XYZ), to_euler(q, RotationOrder::XYZ));
}

#[test]
fn test_unpack_clamps_scalar_part() {
    let q = unpack_from_vector3(vec3(1.0, 1.0, 0.0));
    assert_eq!(q.s, 0.0);
    let q = unpack_from_vector3(vec3(0.0, 0.0, 0.0));
    assert_eq!(q.s, 1.0);
}

#[test]
fn test_slerp_takes_short_arc() {
    let a = Quaternion::from_angle_x(Deg(10.0));
    let b = -Quaternion::from_angle_x(Deg(50.0));
    let mid = slerp(a, b, 0.5);
    assert!((angle_between(mid, Quaternion::from_angle_x(Deg(30.0)))).abs() < 1e-6);
}
