//! The fixed avatar rig that BVH output is written against.
//!
//! Every animation is exported onto the same skeleton: the same joints, in
//! the same order, with the same channel layout. Only the per-frame numbers
//! change. The table below is data, and it has to agree with the hierarchy
//! text in `bvh::hierarchy` joint for joint.
//!
//!     hip
//!      ├ abdomen ─ chest ┬ neck ─ head
//!      │                 ├ lCollar ─ lShldr ─ lForeArm ─ lHand
//!      │                 └ rCollar ─ rShldr ─ rForeArm ─ rHand
//!      ├ lThigh ─ lShin ─ lFoot
//!      └ rThigh ─ rShin ─ rFoot
//!
//! Joints are kept by value in hierarchy order and referred to by index.

use cgmath::{Matrix3, One, Vector3, vec3};
use errors::Result;
use rotation::RotationOrder;

/// Height of the hip above the ground in the rest pose, in BVH units.
pub const REST_HEIGHT: f64 = 43.5285;

pub fn rest_offset() -> Vector3<f64> {
    vec3(0.0, REST_HEIGHT, 0.0)
}

/// One frame's pose for one joint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Key {
    /// Only meaningful on the root.
    pub pos: Vector3<f64>,
    /// Euler angles in degrees, stored by axis (X, Y, Z) regardless of the
    /// joint's channel order.
    pub rot: Vector3<f64>,
    /// Set when `pos` was interpolated rather than decoded.
    pub ignore_pos: bool,
    /// Set when `rot` was interpolated rather than decoded.
    pub ignore_rot: bool,
}

impl Default for Key {
    fn default() -> Key {
        Key {
            pos: vec3(0.0, 0.0, 0.0),
            rot: vec3(0.0, 0.0, 0.0),
            ignore_pos: false,
            ignore_rot: false,
        }
    }
}

pub struct Joint {
    /// Name used in the BVH hierarchy.
    pub name: &'static str,
    /// Name the animation format uses for this joint.
    pub out_name: &'static str,
    pub child_tree_max_depth: u32,
    pub frame_matrix: Matrix3<f64>,
    pub offset_matrix: Matrix3<f64>,
    pub order: RotationOrder,

    pub priority: i32,
    pub num_rot_keys: i32,
    pub num_pos_keys: i32,
    pub keys: Vec<Key>,
}

struct JointDef {
    name: &'static str,
    out_name: &'static str,
    child_tree_max_depth: u32,
    order: RotationOrder,
}

static JOINT_TABLE: [JointDef; 19] = [
    JointDef { name: "hip",      out_name: "mPelvis",        child_tree_max_depth: 6, order: RotationOrder::XZY },
    JointDef { name: "abdomen",  out_name: "mTorso",         child_tree_max_depth: 5, order: RotationOrder::XZY },
    JointDef { name: "chest",    out_name: "mChest",         child_tree_max_depth: 4, order: RotationOrder::XZY },
    JointDef { name: "neck",     out_name: "mNeck",          child_tree_max_depth: 1, order: RotationOrder::XZY },
    JointDef { name: "head",     out_name: "mHead",          child_tree_max_depth: 0, order: RotationOrder::XZY },
    JointDef { name: "lCollar",  out_name: "mCollarLeft",    child_tree_max_depth: 3, order: RotationOrder::YZX },
    JointDef { name: "lShldr",   out_name: "mShoulderLeft",  child_tree_max_depth: 2, order: RotationOrder::ZYX },
    JointDef { name: "lForeArm", out_name: "mElbowLeft",     child_tree_max_depth: 1, order: RotationOrder::YZX },
    JointDef { name: "lHand",    out_name: "mWristLeft",     child_tree_max_depth: 0, order: RotationOrder::ZYX },
    JointDef { name: "rCollar",  out_name: "mCollarRight",   child_tree_max_depth: 3, order: RotationOrder::YZX },
    JointDef { name: "rShldr",   out_name: "mShoulderRight", child_tree_max_depth: 2, order: RotationOrder::ZYX },
    JointDef { name: "rForeArm", out_name: "mElbowRight",    child_tree_max_depth: 1, order: RotationOrder::YZX },
    JointDef { name: "rHand",    out_name: "mWristRight",    child_tree_max_depth: 0, order: RotationOrder::ZYX },
    JointDef { name: "lThigh",   out_name: "mHipLeft",       child_tree_max_depth: 2, order: RotationOrder::XZY },
    JointDef { name: "lShin",    out_name: "mKneeLeft",      child_tree_max_depth: 1, order: RotationOrder::XZY },
    JointDef { name: "lFoot",    out_name: "mAnkleLeft",     child_tree_max_depth: 0, order: RotationOrder::XYZ },
    JointDef { name: "rThigh",   out_name: "mHipRight",      child_tree_max_depth: 2, order: RotationOrder::XZY },
    JointDef { name: "rShin",    out_name: "mKneeRight",     child_tree_max_depth: 1, order: RotationOrder::XZY },
    JointDef { name: "rFoot",    out_name: "mAnkleRight",    child_tree_max_depth: 0, order: RotationOrder::XYZ },
];

/// Frame shared by every joint: the row-vector matrix sending x to y, y to z
/// and z to x.
pub fn rig_frame_matrix() -> Matrix3<f64> {
    Matrix3::new(
        0.0, 1.0, 0.0,
        0.0, 0.0, 1.0,
        1.0, 0.0, 0.0,
    )
}

pub struct Skeleton {
    pub joints: Vec<Joint>,
}

impl Skeleton {
    pub fn new() -> Skeleton {
        let joints = JOINT_TABLE.iter()
            .map(|def| Joint {
                name: def.name,
                out_name: def.out_name,
                child_tree_max_depth: def.child_tree_max_depth,
                frame_matrix: rig_frame_matrix(),
                offset_matrix: Matrix3::one(),
                order: def.order,
                priority: 0,
                num_rot_keys: 0,
                num_pos_keys: 0,
                keys: vec![],
            })
            .collect();
        Skeleton { joints }
    }

    /// Index of the joint that carries position data.
    pub fn root(&self) -> usize {
        0
    }

    pub fn find_by_out_name(&self, out_name: &str) -> Option<usize> {
        self.joints.iter().position(|joint| joint.out_name == out_name)
    }

    /// Replaces the offset rotation of the joint with the given animation
    /// name. Must happen before decoding to have any effect.
    pub fn set_offset_matrix(&mut self, out_name: &str, offset: Matrix3<f64>) -> Result<()> {
        match self.find_by_out_name(out_name) {
            Some(idx) => {
                self.joints[idx].offset_matrix = offset;
                Ok(())
            }
            None => bail!("no joint named {}", out_name),
        }
    }

    /// Gives every joint `num_frames` default keys, with the root resting at
    /// its rest height.
    pub fn allocate_keys(&mut self, num_frames: usize) {
        for joint in &mut self.joints {
            joint.keys = vec![Key::default(); num_frames];
        }
        let root = self.root();
        for key in &mut self.joints[root].keys {
            key.pos.y = REST_HEIGHT;
        }
    }

    pub fn has_keys(&self) -> bool {
        self.joints.iter().any(|joint| !joint.keys.is_empty())
    }
}

#[cfg(test)]
use bvh::hierarchy::HIERARCHY;

#[test]
fn test_table_matches_hierarchy_text() {
    let skel = Skeleton::new();
    let joint_lines: Vec<&str> = HIERARCHY.lines()
        .map(|line| line.trim())
        .filter(|line| line.starts_with("ROOT ") || line.starts_with("JOINT "))
        .collect();
    assert_eq!(joint_lines.len(), skel.joints.len());

    let channel_lines: Vec<&str> = HIERARCHY.lines()
        .map(|line| line.trim())
        .filter(|line| line.starts_with("CHANNELS "))
        .collect();

    for (i, joint) in skel.joints.iter().enumerate() {
        assert!(joint_lines[i].ends_with(joint.name), "{} vs {}", joint_lines[i], joint.name);

        // The last three channels are the rotations, in channel order.
        let channels: Vec<&str> = channel_lines[i].split_whitespace().collect();
        let rot_channels = &channels[channels.len() - 3..];
        for (k, &axis) in joint.order.axes().iter().enumerate() {
            let letter = ["X", "Y", "Z"][axis];
            assert_eq!(rot_channels[k], format!("{}rotation", letter));
        }
    }
}

#[test]
fn test_allocate_keys_sets_rest_height() {
    let mut skel = Skeleton::new();
    assert!(!skel.has_keys());
    skel.allocate_keys(3);
    assert!(skel.joints.iter().all(|j| j.keys.len() == 3));
    assert!(skel.joints[0].keys.iter().all(|k| k.pos.y == REST_HEIGHT));
    assert!(skel.joints[1].keys.iter().all(|k| k.pos.y == 0.0));
}

#[test]
fn test_lookup_and_offset_override() {
    let mut skel = Skeleton::new();
    assert_eq!(skel.find_by_out_name("mPelvis"), Some(0));
    assert_eq!(skel.find_by_out_name("mAnkleRight"), Some(18));
    assert_eq!(skel.find_by_out_name("hip"), None);

    let m = Matrix3::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 0.0);
    skel.set_offset_matrix("mChest", m).unwrap();
    assert_eq!(skel.joints[2].offset_matrix, m);
    assert!(skel.set_offset_matrix("mTail", m).is_err());
}
