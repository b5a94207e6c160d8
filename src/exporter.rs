//! Decode-then-write facade over the skeleton, the `.anim` reader and the
//! BVH writer.

use anim::{self, Animation, AnimationHeader};
use bvh;
use errors::Result;
use skeleton::{Joint, Skeleton};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use util::cur::Cur;

pub struct Exporter {
    skel: Skeleton,
    anim: Option<Animation>,
}

impl Exporter {
    pub fn new() -> Exporter {
        Exporter {
            skel: Skeleton::new(),
            anim: None,
        }
    }

    /// For overriding joint offsets before `deserialize`.
    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skel
    }

    /// Decodes one animation. An exporter holds at most one; make a new
    /// one for the next file.
    pub fn deserialize(&mut self, cur: Cur) -> Result<()> {
        if self.anim.is_some() || self.skel.has_keys() {
            bail!("exporter already holds an animation");
        }
        let anim = anim::read_animation(cur, &mut self.skel)?;
        info!("decoded animation: {} frames, {:.3}s", anim.num_frames(), anim.header.duration);
        self.anim = Some(anim);
        Ok(())
    }

    pub fn write_bvh(&self, s: &mut String) -> Result<()> {
        let anim = match self.anim {
            Some(ref anim) => anim,
            None => bail!("nothing to export: no animation was decoded"),
        };
        bvh::write(s, &self.skel, anim.num_frames(), anim.frame_time())
    }

    /// Writes the decoded animation as a BVH file at `path`. The text is
    /// built in full before the file is created.
    pub fn export_bvh_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut s = String::new();
        self.write_bvh(&mut s)?;

        let mut f = File::create(path)?;
        f.write_all(s.as_bytes())?;
        debug!("wrote {} bytes to {}", s.len(), path.display());
        Ok(())
    }

    pub fn header(&self) -> Option<&AnimationHeader> {
        self.anim.as_ref().map(|anim| &anim.header)
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.anim.as_ref()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.skel.joints
    }

    pub fn num_frames(&self) -> usize {
        self.anim.as_ref().map(|anim| anim.num_frames()).unwrap_or(0)
    }

    pub fn frame_time(&self) -> f64 {
        self.anim.as_ref().map(|anim| anim.frame_time()).unwrap_or(0.0)
    }
}

#[cfg(test)]
use anim::test_blob::Blob;
#[cfg(test)]
use cgmath::{One, Quaternion, vec3};
#[cfg(test)]
use rotation::RotationOrder;
#[cfg(test)]
use std::env;
#[cfg(test)]
use std::fs;
#[cfg(test)]
use std::io::Read;

/// Hip only: identity at 0.1s (frame 2), 30 degrees about Y at 2.0s (frame
/// 40), and the root at (6, 40, -3) at 1.0s (frame 20).
#[cfg(test)]
fn hip_only_blob() -> Blob {
    let mut blob = Blob::with_header(1, 0, 2.0, 1);
    blob.joint("mPelvis", 4, 2)
        .rot_key(0.1, Quaternion::one())
        .euler_key(2.0, vec3(0.0, 30.0, 0.0), RotationOrder::XZY)
        .i32(1)
        .pos_key(1.0, vec3(6.0, 40.0, -3.0))
        .i32(0);
    blob
}

#[cfg(test)]
fn assert_values_close(line: &str, expected: &[f64], eps: f64) {
    let values: Vec<f64> = line.split_whitespace().map(|x| x.parse().unwrap()).collect();
    for (got, want) in values.iter().zip(expected) {
        assert!((got - want).abs() < eps, "{:?} != {:?}", &values[..expected.len()], expected);
    }
}

#[test]
fn test_hip_only_end_to_end() {
    let blob = hip_only_blob();
    let mut exporter = Exporter::new();
    exporter.deserialize(Cur::new(blob.bytes())).unwrap();
    assert_eq!(exporter.num_frames(), 40);
    assert_eq!(exporter.header().unwrap().num_joints, 1);
    assert_eq!(exporter.joints().len(), 19);

    let path = env::temp_dir().join(format!("animbvh-test-{}.bvh", ::std::process::id()));
    exporter.export_bvh_file(&path).unwrap();
    let mut text = String::new();
    File::open(&path).unwrap().read_to_string(&mut text).unwrap();
    let _ = fs::remove_file(&path);

    assert!(text.starts_with("HIERARCHY\nROOT hip\n"));
    assert!(text.contains(concat!(
        "\t\t\t\t\t\tJOINT rHand\n",
        "\t\t\t\t\t\t{\n",
        "\t\t\t\t\t\t\tOFFSET -8.349810 0.000000 0.000000\n",
    )));
    // 0.1s doesn't quantize exactly, so neither does the frame time.
    assert!(text.contains("}\nMOTION\nFrames: 40\nFrame Time: 0.0500"));

    let frames: Vec<&str> = text.lines().skip_while(|l| !l.starts_with("Frame Time:")).skip(1).collect();
    assert_eq!(frames.len(), 40);
    for line in &frames {
        assert_eq!(line.split_whitespace().count(), 3 + 3 * 19);
    }
    // Root position, then the hip's X, Z and Y rotations.
    assert_values_close(frames[0], &[0.0, 43.5285, 0.0, 0.0, 0.0, 0.0], 1e-9);
    assert_values_close(frames[19], &[6.0, 40.0, -3.0], 0.01);
    assert_values_close(frames[39], &[0.0, 43.5285, 0.0, 0.0, 0.0, 30.0], 0.01);
    assert!(frames[39].ends_with(' '));
}

#[test]
fn test_export_needs_an_animation() {
    let exporter = Exporter::new();
    let mut s = String::new();
    assert!(exporter.write_bvh(&mut s).is_err());
    assert!(s.is_empty());
    assert_eq!(exporter.num_frames(), 0);
    assert!(exporter.header().is_none());
}

#[test]
fn test_one_animation_per_exporter() {
    let blob = hip_only_blob();
    let mut exporter = Exporter::new();
    exporter.deserialize(Cur::new(blob.bytes())).unwrap();
    assert!(exporter.deserialize(Cur::new(blob.bytes())).is_err());
    assert_eq!(exporter.num_frames(), 40);
}

#[test]
fn test_unwritable_path_is_an_error() {
    let blob = hip_only_blob();
    let mut exporter = Exporter::new();
    exporter.deserialize(Cur::new(blob.bytes())).unwrap();
    let path = env::temp_dir().join("animbvh-no-such-dir").join("nested").join("out.bvh");
    assert!(exporter.export_bvh_file(&path).is_err());
}
