//! BVH text output.
//!
//! The hierarchy never changes, so it is written out verbatim. The motion
//! section is one line per frame: the root position, then the three
//! rotation channels of each joint in hierarchy order.

pub mod hierarchy;

use errors::Result;
use skeleton::Skeleton;
use std::fmt::Write;

/// Writes the BVH file for the already-decoded `skel` into `s`.
pub fn write(s: &mut String, skel: &Skeleton, num_frames: usize, frame_time: f64) -> Result<()> {
    if let Some(joint) = skel.joints.iter().find(|joint| joint.keys.len() < num_frames) {
        bail!("joint {} has {} keys but {} frames are being written",
            joint.name, joint.keys.len(), num_frames);
    }

    s.push_str(hierarchy::HIERARCHY);
    s.push_str("MOTION\n");
    write!(s, "Frames: {}\n", num_frames)?;
    write!(s, "Frame Time: {:.6}\n", frame_time)?;

    let root = skel.root();
    for frame in 0..num_frames {
        for (i, joint) in skel.joints.iter().enumerate() {
            let key = &joint.keys[frame];
            if i == root {
                write!(s, "{:.6} {:.6} {:.6} ", key.pos.x, key.pos.y, key.pos.z)?;
            }
            let [a, b, c] = joint.order.axes();
            write!(s, "{:.6} {:.6} {:.6} ", key.rot[a], key.rot[b], key.rot[c])?;
        }
        s.push('\n');
    }

    Ok(())
}

#[cfg(test)]
use cgmath::vec3;

#[test]
fn test_empty_motion() {
    let skel = Skeleton::new();
    let mut s = String::new();
    write(&mut s, &skel, 0, 0.0).unwrap();
    let expected = format!("{}MOTION\nFrames: 0\nFrame Time: 0.000000\n", hierarchy::HIERARCHY);
    assert_eq!(s, expected);
}

#[test]
fn test_channels_follow_joint_order() {
    let mut skel = Skeleton::new();
    skel.allocate_keys(1);
    skel.joints[0].keys[0].pos = vec3(1.0, 2.0, 3.0);
    // hip is XZY, lShldr (6) is ZYX, lFoot (15) is XYZ.
    skel.joints[0].keys[0].rot = vec3(10.0, 20.0, 30.0);
    skel.joints[6].keys[0].rot = vec3(-1.5, 2.25, 0.125);
    skel.joints[15].keys[0].rot = vec3(4.0, 5.0, 6.0);

    let mut s = String::new();
    write(&mut s, &skel, 1, 1.0 / 30.0).unwrap();

    let motion = &s[hierarchy::HIERARCHY.len()..];
    let mut lines = motion.lines();
    assert_eq!(lines.next(), Some("MOTION"));
    assert_eq!(lines.next(), Some("Frames: 1"));
    assert_eq!(lines.next(), Some("Frame Time: 0.033333"));

    let line = lines.next().unwrap();
    assert!(line.ends_with(' '));
    let values: Vec<&str> = line.split_whitespace().collect();
    assert_eq!(values.len(), 3 + 3 * skel.joints.len());
    assert_eq!(&values[0..6], &["1.000000", "2.000000", "3.000000", "10.000000", "30.000000", "20.000000"]);
    let lshldr = 3 + 3 * 6;
    assert_eq!(&values[lshldr..lshldr + 3], &["0.125000", "2.250000", "-1.500000"]);
    let lfoot = 3 + 3 * 15;
    assert_eq!(&values[lfoot..lfoot + 3], &["4.000000", "5.000000", "6.000000"]);
    assert_eq!(lines.next(), None);
}

#[test]
fn test_short_key_arrays_are_refused() {
    let mut skel = Skeleton::new();
    skel.allocate_keys(2);
    skel.joints[4].keys.pop();
    let mut s = String::new();
    assert!(write(&mut s, &skel, 2, 0.1).is_err());
}
