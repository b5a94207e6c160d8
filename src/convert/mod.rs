//! `convert` subcommand: `.anim` in, `.bvh` out.

use cgmath::{Matrix3, Vector3, vec3};
use clap::ArgMatches;
use errors::Result;
use exporter::Exporter;
use files::decode_file;
use rotation::from_euler;
use std::path::{Path, PathBuf};

pub fn main(matches: &ArgMatches) -> Result<()> {
    let input = PathBuf::from(matches.value_of_os("INPUT").unwrap());
    let output = match matches.value_of_os("OUTPUT") {
        Some(output) => PathBuf::from(output),
        None => default_output_path(&input),
    };

    let mut exporter = Exporter::new();
    if let Some(offsets) = matches.values_of("OFFSET") {
        for arg in offsets {
            let (joint_name, angles) = parse_offset(arg)?;
            apply_offset(&mut exporter, joint_name, angles)?;
        }
    }

    decode_file(&input, &mut exporter)?;
    if let Some(header) = exporter.header() {
        debug!("emote {:?}, priority {}, loop {} ({:.3}s to {:.3}s)",
            header.emote_name, header.base_priority, header.looping,
            header.loop_in_point, header.loop_out_point);
    }
    if exporter.num_frames() == 0 {
        warn!("{} has no frames; writing the hierarchy only", input.display());
    }
    exporter.export_bvh_file(&output)?;

    info!("wrote {}", output.display());
    Ok(())
}

/// `foo/walk.anim` -> `foo/walk.bvh`
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("bvh")
}

/// Parses `JOINT=X,Y,Z`: a joint's name in the animation and the X, Y and
/// Z angles (degrees) of its offset rotation.
pub fn parse_offset(arg: &str) -> Result<(&str, Vector3<f64>)> {
    let mut parts = arg.splitn(2, '=');
    let joint_name = parts.next().unwrap_or("").trim();
    let angles = parts.next()
        .map(|angles| {
            angles.split(',')
                .map(|x| x.trim().parse::<f64>().ok())
                .collect::<Option<Vec<f64>>>()
        });
    match angles {
        Some(Some(ref v)) if v.len() == 3 && !joint_name.is_empty() => {
            Ok((joint_name, vec3(v[0], v[1], v[2])))
        }
        _ => bail!("bad offset {:?}, expected JOINT=X,Y,Z", arg),
    }
}

/// Sets the offset of the joint named `joint_name` to the rotation with
/// the given Euler angles, composed in that joint's channel order.
pub fn apply_offset(exporter: &mut Exporter, joint_name: &str, angles: Vector3<f64>) -> Result<()> {
    let skel = exporter.skeleton_mut();
    let order = match skel.find_by_out_name(joint_name) {
        Some(idx) => skel.joints[idx].order,
        None => bail!("can't set offset: no joint named {}", joint_name),
    };
    let offset = Matrix3::from(from_euler(angles, order));
    skel.set_offset_matrix(joint_name, offset)?;
    debug!("offset for {}: {:?} ({})", joint_name, angles, order.name());
    Ok(())
}

#[test]
fn test_default_output_path() {
    assert_eq!(default_output_path(Path::new("anims/walk.anim")), PathBuf::from("anims/walk.bvh"));
    assert_eq!(default_output_path(Path::new("wave")), PathBuf::from("wave.bvh"));
}

#[test]
fn test_parse_offset() {
    let (name, angles) = parse_offset("mTorso=0, 20,-7.5").unwrap();
    assert_eq!(name, "mTorso");
    assert_eq!(angles, vec3(0.0, 20.0, -7.5));

    assert!(parse_offset("mTorso").is_err());
    assert!(parse_offset("mTorso=1,2").is_err());
    assert!(parse_offset("mTorso=1,2,3,4").is_err());
    assert!(parse_offset("mTorso=1,two,3").is_err());
    assert!(parse_offset("=1,2,3").is_err());
}

#[test]
fn test_offset_applies_before_decoding() {
    use anim::test_blob::Blob;
    use cgmath::{InnerSpace, One, Quaternion};
    use rotation::{RotationOrder, matrix_rotation};
    use util::cur::Cur;

    let pose = vec3(25.0, -40.0, 10.0);
    let offset_angles = vec3(0.0, 20.0, 0.0);

    let mut exporter = Exporter::new();
    apply_offset(&mut exporter, "mTorso", offset_angles).unwrap();
    assert!(apply_offset(&mut exporter, "mTail", offset_angles).is_err());

    let abdomen = &exporter.joints()[1];
    let offset_rot = matrix_rotation(abdomen.offset_matrix);
    let expected = from_euler(offset_angles, RotationOrder::XZY);
    assert!((offset_rot.dot(expected).abs() - 1.0).abs() < 1e-12);

    let mut blob = Blob::with_header(1, 0, 1.0, 2);
    blob.joint("mPelvis", 4, 1)
        .rot_key(0.2, Quaternion::one())
        .i32(0);
    blob.joint("mTorso", 2, 1)
        .rot_key_with_offset(0.3, from_euler(pose, RotationOrder::XZY), offset_rot)
        .i32(0)
        .i32(0);
    exporter.deserialize(Cur::new(blob.bytes())).unwrap();

    let rot = exporter.joints()[1].keys[2].rot;
    for i in 0..3 {
        assert!((rot[i] - pose[i]).abs() < 0.01, "{:?} != {:?}", rot, pose);
    }
}
