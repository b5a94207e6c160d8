//! `info` subcommand: prints a JSON summary of a decoded `.anim` file.

use clap::ArgMatches;
use errors::Result;
use exporter::Exporter;
use files::load_animation;
use json::JsonValue;
use skeleton::Joint;
use std::path::PathBuf;

pub fn main(matches: &ArgMatches) -> Result<()> {
    let input = PathBuf::from(matches.value_of_os("INPUT").unwrap());
    let exporter = load_animation(&input)?;
    println!("{}", summary(&exporter).pretty(2));
    Ok(())
}

pub fn summary(exporter: &Exporter) -> JsonValue {
    let header = match exporter.animation() {
        Some(anim) => {
            let h = &anim.header;
            object!(
                "version" => format!("{}.{}", h.version, h.sub_version),
                "base_priority" => h.base_priority,
                "duration" => h.duration,
                "emote_name" => h.emote_name.as_str(),
                "loop" => h.looping,
                "loop_in_point" => h.loop_in_point,
                "loop_out_point" => h.loop_out_point,
                "ease_in_duration" => h.ease_in_duration,
                "ease_out_duration" => h.ease_out_duration,
                "hand_pose" => h.hand_pose,
                "num_joints" => h.num_joints,
                "num_constraints" => anim.num_constraints,
            )
        }
        None => JsonValue::Null,
    };

    let joints = exporter.joints().iter()
        .filter(|joint| joint.num_rot_keys != 0 || joint.num_pos_keys != 0)
        .map(joint_summary)
        .collect();

    object!(
        "header" => header,
        "frames" => exporter.num_frames(),
        "frame_time" => exporter.frame_time(),
        "joints" => JsonValue::Array(joints),
    )
}

fn joint_summary(joint: &Joint) -> JsonValue {
    // Frame 0 is always flagged; it's the reference pose.
    let motion = if joint.keys.is_empty() { &joint.keys[..] } else { &joint.keys[1..] };
    let interpolated_rot = motion.iter().filter(|key| key.ignore_rot).count();
    let interpolated_pos = motion.iter().filter(|key| key.ignore_pos).count();

    object!(
        "name" => joint.name,
        "anim_name" => joint.out_name,
        "order" => joint.order.name(),
        "depth" => joint.child_tree_max_depth,
        "priority" => joint.priority,
        "rot_keys" => joint.num_rot_keys,
        "pos_keys" => joint.num_pos_keys,
        "interpolated_rot_frames" => interpolated_rot,
        "interpolated_pos_frames" => interpolated_pos,
    )
}

#[cfg(test)]
use anim::test_blob::Blob;
#[cfg(test)]
use cgmath::{One, Quaternion, vec3};
#[cfg(test)]
use rotation::RotationOrder;
#[cfg(test)]
use util::cur::Cur;

#[test]
fn test_summary_lists_animated_joints() {
    let mut blob = Blob::with_header(1, 0, 1.0, 2);
    blob.joint("mPelvis", 4, 1)
        .rot_key(0.2, Quaternion::one())
        .i32(0);
    blob.joint("mHead", 2, 2)
        .euler_key(0.2, vec3(0.0, 10.0, 0.0), RotationOrder::XZY)
        .euler_key(0.6, vec3(0.0, 50.0, 0.0), RotationOrder::XZY)
        .i32(0)
        .i32(0);
    let mut exporter = Exporter::new();
    exporter.deserialize(Cur::new(blob.bytes())).unwrap();

    let s = summary(&exporter);
    assert_eq!(s["frames"], 10);
    assert_eq!(s["header"]["version"], "1.0");
    assert_eq!(s["header"]["loop"], true);
    assert_eq!(s["joints"].len(), 2);

    let head = &s["joints"][1];
    assert_eq!(head["name"], "head");
    assert_eq!(head["anim_name"], "mHead");
    assert_eq!(head["order"], "XZY");
    assert_eq!(head["priority"], 2);
    assert_eq!(head["rot_keys"], 2);
    // Frames 3, 4 and 5 lie between the keys on frames 2 and 6.
    assert_eq!(head["interpolated_rot_frames"], 3);
    assert_eq!(head["interpolated_pos_frames"], 0);
}

#[test]
fn test_summary_of_an_empty_exporter() {
    let s = summary(&Exporter::new());
    assert!(s["header"].is_null());
    assert_eq!(s["frames"], 0);
    assert_eq!(s["joints"].len(), 0);
}
