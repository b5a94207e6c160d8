//! Keyframe animation files (`.anim`).
//!
//! The format is a short header followed by one record per animated joint.
//! Each record holds sparse rotation keys and sparse position keys, with
//! times, rotations and positions all quantized to 16 bits. See `read` for
//! the layout.

pub mod read;
mod interp;
#[cfg(test)]
pub mod test_blob;

pub use self::read::read_animation;

/// Bound of the quantized hip translation, in meters.
pub const MAX_PELVIS_OFFSET: f64 = 5.0;

/// Positions are stored in meters and written out in inches.
pub const INCHES_TO_METERS: f64 = 0.02540005;

/// Global values read once from the start of the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationHeader {
    pub version: u16,
    pub sub_version: u16,
    pub base_priority: i32,
    /// Seconds.
    pub duration: f32,
    pub emote_name: String,
    pub loop_in_point: f32,
    pub loop_out_point: f32,
    pub looping: bool,
    pub ease_in_duration: f32,
    pub ease_out_duration: f32,
    pub hand_pose: u32,
    pub num_joints: u32,
}

/// Output frame rate, fixed by the first rotation key in the file.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameTiming {
    /// Seconds per frame.
    pub frame_time: f64,
    pub num_frames: usize,
}

impl FrameTiming {
    /// The first key of a file always sits on frame 2.
    pub fn from_first_key(time: f64, duration: f64) -> Option<FrameTiming> {
        let frame_time = time * 0.5;
        if !(frame_time > 0.0) {
            return None;
        }
        let num_frames = (duration / frame_time + 0.5).floor();
        if !(num_frames >= 1.0) {
            return None;
        }
        Some(FrameTiming { frame_time, num_frames: num_frames as usize })
    }

    /// The 1-based frame number a key time falls on, if that frame exists.
    pub fn frame_at(&self, time: f64) -> Option<usize> {
        let frame = (time / self.frame_time + 0.5).floor();
        if frame >= 1.0 && frame <= self.num_frames as f64 {
            Some(frame as usize)
        } else {
            None
        }
    }
}

/// A decoded file. The per-frame poses live in the `Skeleton` it was
/// decoded into.
#[derive(Clone, Debug)]
pub struct Animation {
    pub header: AnimationHeader,
    /// `None` when the file had no rotation keys for any known joint.
    pub timing: Option<FrameTiming>,
    pub num_constraints: i32,
}

impl Animation {
    pub fn num_frames(&self) -> usize {
        self.timing.map(|t| t.num_frames).unwrap_or(0)
    }

    pub fn frame_time(&self) -> f64 {
        self.timing.map(|t| t.frame_time).unwrap_or(0.0)
    }
}

#[test]
fn test_frame_timing() {
    // The first key encodes frame 2.
    let timing = FrameTiming::from_first_key(0.1, 2.0).unwrap();
    assert!((timing.frame_time - 0.05).abs() < 1e-12);
    assert_eq!(timing.num_frames, 40);

    assert_eq!(timing.frame_at(0.1), Some(2));
    assert_eq!(timing.frame_at(0.124), Some(2));
    assert_eq!(timing.frame_at(0.126), Some(3));
    assert_eq!(timing.frame_at(2.0), Some(40));
    assert_eq!(timing.frame_at(0.0), None);
    assert_eq!(timing.frame_at(2.1), None);

    assert_eq!(FrameTiming::from_first_key(0.0, 2.0), None);
    assert_eq!(FrameTiming::from_first_key(-0.5, -1.0), None);
}
