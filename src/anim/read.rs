//! Decoding `.anim` files onto the rig.
//!
//! Layout (all little-endian):
//!
//!     version: u16              must be 1
//!     sub_version: u16          must be 0
//!     base_priority: i32
//!     duration: f32             seconds
//!     emote_name: NUL-terminated string
//!     loop_in_point: f32
//!     loop_out_point: f32
//!     loop: i32
//!     ease_in_duration: f32
//!     ease_out_duration: f32
//!     hand_pose: u32
//!     num_joints: u32
//!     joints[num_joints]:
//!         joint_name: NUL-terminated string
//!         joint_priority: i32
//!         num_rot_keys: i32
//!         rot_keys[num_rot_keys]: (time, x, y, z): (u16, u16, u16, u16)
//!         num_pos_keys: i32
//!         pos_keys[num_pos_keys]: (time, x, y, z): (u16, u16, u16, u16)
//!     num_constraints: i32
//!
//! Times are quantized over [0, duration], rotation components over
//! [-1, 1] (the vector part of a unit quaternion) and position components
//! over [-MAX_PELVIS_OFFSET, MAX_PELVIS_OFFSET] meters.
//!
//! Keys are sparse. Frames between two keys are filled in by interpolation
//! and flagged so.

use anim::{Animation, AnimationHeader, FrameTiming, MAX_PELVIS_OFFSET, INCHES_TO_METERS};
use anim::interp::frames_between;
use cgmath::{One, Quaternion, VectorSpace, vec3};
use errors::{ErrorKind, Result};
use rotation::{self, matrix_rotation, unpack_from_vector3, unretarget};
use skeleton::{Skeleton, rest_offset};
use util::cur::Cur;

/// Size of one rotation or position key.
const KEY_SIZE: usize = 8;

/// Decodes the animation in `cur` into `skel`, filling every joint's keys.
///
/// Fails before touching `skel` if the version isn't 1.0.
pub fn read_animation(cur: Cur, skel: &mut Skeleton) -> Result<Animation> {
    fields!(cur, anim_version {
        version: u16,
        sub_version: u16,
        end: Cur,
    });

    if version != 1 || sub_version != 0 {
        bail!(ErrorKind::UnsupportedVersion(version, sub_version));
    }

    fields!(end, anim_header {
        base_priority: i32,
        duration: f32,
        emote_name: cstr,
        loop_in_point: f32,
        loop_out_point: f32,
        looping: i32,
        ease_in_duration: f32,
        ease_out_duration: f32,
        hand_pose: u32,
        num_joints: u32,
        end: Cur,
    });
    check!(duration.is_finite() && duration >= 0.0)?;

    let header = AnimationHeader {
        version,
        sub_version,
        base_priority,
        duration,
        emote_name,
        loop_in_point,
        loop_out_point,
        looping: looping != 0,
        ease_in_duration,
        ease_out_duration,
        hand_pose,
        num_joints,
    };

    let mut decoder = Decoder {
        cur: end,
        skel,
        duration: duration as f64,
        timing: None,
    };

    for _ in 0..num_joints {
        decoder.read_joint()?;
    }

    fields!(decoder.cur, anim_constraints {
        num_constraints: i32,
        end: Cur,
    });

    if num_constraints > 0 {
        debug!("ignoring {} constraints ({} bytes)", num_constraints, end.bytes_remaining());
    }

    let timing = decoder.timing;
    match timing {
        Some(t) => debug!("{} frames at {:.6}s per frame", t.num_frames, t.frame_time),
        None => warn!("animation has no rotation keys; nothing to export"),
    }

    Ok(Animation { header, timing, num_constraints })
}

struct Decoder<'a, 'b> {
    cur: Cur<'a>,
    skel: &'b mut Skeleton,
    duration: f64,
    timing: Option<FrameTiming>,
}

impl<'a, 'b> Decoder<'a, 'b> {
    fn read_joint(&mut self) -> Result<()> {
        fields!(self.cur, joint {
            joint_name: cstr,
            joint_priority: i32,
            num_rot_keys: i32,
            end: Cur,
        });
        self.cur = end;

        let idx = match self.skel.find_by_out_name(&joint_name) {
            Some(idx) => idx,
            None => {
                warn!("skipping unknown joint {:?}", joint_name);
                return self.skip_joint(num_rot_keys);
            }
        };

        {
            let joint = &mut self.skel.joints[idx];
            joint.priority = joint_priority;
            joint.num_rot_keys = num_rot_keys;
        }
        let num_rot_keys = key_count(num_rot_keys, &joint_name, "rotation");
        self.read_rot_keys(idx, num_rot_keys)?;

        fields!(self.cur, joint_pos {
            num_pos_keys: i32,
            end: Cur,
        });
        self.cur = end;

        self.skel.joints[idx].num_pos_keys = num_pos_keys;
        let num_pos_keys = key_count(num_pos_keys, &joint_name, "position");
        self.read_pos_keys(idx, num_pos_keys)
    }

    /// Steps over the rest of a joint record without interpreting it.
    fn skip_joint(&mut self, num_rot_keys: i32) -> Result<()> {
        self.cur.next_n_u8s(KEY_SIZE * num_rot_keys.max(0) as usize)?;
        let num_pos_keys = self.cur.next::<i32>()?;
        self.cur.next_n_u8s(KEY_SIZE * num_pos_keys.max(0) as usize)?;
        Ok(())
    }

    /// Frame timing, set up by the first rotation key ever read.
    fn timing_for_key(&mut self, time: f64) -> Result<FrameTiming> {
        if let Some(timing) = self.timing {
            return Ok(timing);
        }
        let timing = match FrameTiming::from_first_key(time, self.duration) {
            Some(timing) => timing,
            None => bail!("can't derive a frame rate from a first key at {}s of {}s",
                time, self.duration),
        };
        self.skel.allocate_keys(timing.num_frames);
        self.timing = Some(timing);
        Ok(timing)
    }

    fn read_rot_keys(&mut self, idx: usize, count: usize) -> Result<()> {
        let duration = self.duration;
        let (frame_rot, offset_rot, order) = {
            let joint = &self.skel.joints[idx];
            (matrix_rotation(joint.frame_matrix), matrix_rotation(joint.offset_matrix), joint.order)
        };

        let mut last_frame = 1;
        let mut last_rot = Quaternion::one();

        for j in 0..count {
            fields!(self.cur, rot_key {
                time: (unorm16(0.0, duration)),
                rot_angle_x: (unorm16(-1.0, 1.0)),
                rot_angle_y: (unorm16(-1.0, 1.0)),
                rot_angle_z: (unorm16(-1.0, 1.0)),
                end: Cur,
            });
            self.cur = end;

            let timing = self.timing_for_key(time)?;
            let keys = &mut self.skel.joints[idx].keys;

            if j == 0 {
                // Frame 0 is the reference pose, not part of the motion.
                keys[0].ignore_pos = true;
                keys[0].ignore_rot = true;
            }

            let frame = match timing.frame_at(time) {
                Some(frame) => frame,
                None => {
                    warn!("dropping rotation key at {}s: outside of frames 1..{}",
                        time, timing.num_frames);
                    continue;
                }
            };

            let out_rot = unpack_from_vector3(vec3(rot_angle_x, rot_angle_y, rot_angle_z));
            let in_rot = unretarget(out_rot, frame_rot, offset_rot);

            keys[frame - 1].rot = rotation::to_euler(in_rot, order);

            for (n, t) in frames_between(last_frame, frame) {
                let q = rotation::slerp(last_rot, in_rot, t);
                keys[n - 1].rot = rotation::to_euler(q, order);
                keys[n - 1].ignore_rot = true;
            }

            last_frame = frame;
            last_rot = in_rot;
        }

        Ok(())
    }

    fn read_pos_keys(&mut self, idx: usize, count: usize) -> Result<()> {
        let duration = self.duration;
        let frame_rot = matrix_rotation(self.skel.joints[idx].frame_matrix);
        let inv_frame_rot = frame_rot.conjugate();

        let mut last_frame = 1;
        let mut last_pos = rest_offset();

        for _ in 0..count {
            fields!(self.cur, pos_key {
                time: (unorm16(0.0, duration)),
                pos_x: (unorm16(-MAX_PELVIS_OFFSET, MAX_PELVIS_OFFSET)),
                pos_y: (unorm16(-MAX_PELVIS_OFFSET, MAX_PELVIS_OFFSET)),
                pos_z: (unorm16(-MAX_PELVIS_OFFSET, MAX_PELVIS_OFFSET)),
                end: Cur,
            });
            self.cur = end;

            let timing = match self.timing {
                Some(timing) => timing,
                None => bail!("position key at {}s comes before any rotation key", time),
            };

            let frame = match timing.frame_at(time) {
                Some(frame) => frame,
                None => {
                    warn!("dropping position key at {}s: outside of frames 1..{}",
                        time, timing.num_frames);
                    continue;
                }
            };

            let pos = vec3(pos_x, pos_y, pos_z) / INCHES_TO_METERS;
            let pos = inv_frame_rot * pos + rest_offset();

            let keys = &mut self.skel.joints[idx].keys;
            keys[frame - 1].pos = pos;

            for (n, t) in frames_between(last_frame, frame) {
                keys[n - 1].pos = last_pos.lerp(pos, t);
                keys[n - 1].ignore_pos = true;
            }

            last_frame = frame;
            last_pos = pos;
        }

        Ok(())
    }
}

fn key_count(count: i32, joint_name: &str, what: &str) -> usize {
    if count < 0 {
        warn!("joint {} has a negative number of {} keys ({}); reading none",
            joint_name, what, count);
        0
    } else {
        count as usize
    }
}

#[cfg(test)]
use anim::test_blob::Blob;
#[cfg(test)]
use cgmath::{Deg, InnerSpace, Matrix3, Rotation3, Vector3};
#[cfg(test)]
use rotation::{RotationOrder, angle_between, from_euler};

#[cfg(test)]
const HIP: usize = 0;
#[cfg(test)]
const ABDOMEN: usize = 1;
#[cfg(test)]
const HEAD: usize = 4;

#[cfg(test)]
fn assert_close(a: Vector3<f64>, b: Vector3<f64>, tol: f64) {
    assert!((a - b).magnitude() < tol, "{:?} != {:?}", a, b);
}

#[cfg(test)]
/// Header plus a hip record whose only rotation key pins the frame rate:
/// `frame_time` seconds per frame over `duration` seconds.
fn hip_blob(duration: f32, frame_time: f64, num_joints: u32) -> Blob {
    let mut blob = Blob::with_header(1, 0, duration, num_joints);
    blob.joint("mPelvis", 4, 1)
        .rot_key(2.0 * frame_time, Quaternion::one())
        .i32(0);
    blob
}

#[cfg(test)]
fn decode(blob: &Blob) -> (Skeleton, Result<Animation>) {
    let mut skel = Skeleton::new();
    let res = read_animation(Cur::new(blob.bytes()), &mut skel);
    (skel, res)
}

#[test]
fn test_header_fields() {
    let mut blob = Blob::with_header(1, 0, 2.0, 0);
    blob.i32(0);
    let (skel, res) = decode(&blob);
    let anim = res.unwrap();
    assert_eq!(anim.header.base_priority, 3);
    assert_eq!(anim.header.duration, 2.0);
    assert_eq!(anim.header.loop_out_point, 2.0);
    assert!(anim.header.looping);
    assert_eq!(anim.header.ease_in_duration, 0.25);
    assert_eq!(anim.header.num_joints, 0);
    assert_eq!(anim.timing, None);
    assert_eq!(anim.num_frames(), 0);
    assert!(!skel.has_keys());
}

#[test]
fn test_bad_version_fails_without_allocating() {
    let mut blob = Blob::with_header(2, 0, 2.0, 1);
    blob.joint("mPelvis", 4, 1).rot_key(0.1, Quaternion::one()).i32(0).i32(0);
    let (skel, res) = decode(&blob);
    match res {
        Err(::errors::Error(ErrorKind::UnsupportedVersion(2, 0), _)) => (),
        Err(e) => panic!("wrong error: {}", e),
        Ok(_) => panic!("version 2 was accepted"),
    }
    assert!(!skel.has_keys());

    let blob = Blob::with_header(1, 1, 2.0, 0);
    let (skel, res) = decode(&blob);
    assert!(res.is_err());
    assert!(!skel.has_keys());
}

#[test]
fn test_nonsense_duration_is_rejected() {
    for &duration in &[-1.0, ::std::f32::NAN] {
        let mut blob = Blob::with_header(1, 0, duration, 0);
        blob.i32(0);
        let (_, res) = decode(&blob);
        assert!(res.is_err());
    }
}

#[test]
fn test_frame_count_from_first_key() {
    let mut blob = hip_blob(2.0, 0.05, 1);
    blob.i32(0);
    let (skel, res) = decode(&blob);
    let anim = res.unwrap();
    assert!((anim.frame_time() - 0.05).abs() < 1e-4);
    assert_eq!(anim.num_frames(), 40);
    assert!(skel.joints.iter().all(|j| j.keys.len() == 40));
    assert!(skel.joints[HIP].keys.iter().all(|k| k.pos.y == 43.5285));
    assert!(skel.joints[HIP].keys[0].ignore_rot && skel.joints[HIP].keys[0].ignore_pos);
    assert_eq!(skel.joints[HIP].priority, 4);
    assert_eq!(skel.joints[HIP].num_rot_keys, 1);
}

#[test]
fn test_decoded_rotation_round_trips() {
    let ft = 0.1;
    let angles = vec3(25.0, -40.0, 10.0);
    let mut blob = hip_blob(1.0, ft, 2);
    blob.joint("mTorso", 2, 1)
        .euler_key(3.0 * ft, angles, RotationOrder::XZY)
        .i32(0)
        .i32(0);
    let (skel, res) = decode(&blob);
    res.unwrap();
    let key = skel.joints[ABDOMEN].keys[2];
    assert_close(key.rot, angles, 0.01);
    assert!(!key.ignore_rot);
}

#[test]
fn test_offset_override_is_undone() {
    let ft = 0.1;
    let pose = vec3(25.0, -40.0, 10.0);
    let offset = Matrix3::from(Quaternion::from_angle_y(Deg(20.0)));
    let offset_rot = matrix_rotation(offset);

    let mut blob = hip_blob(1.0, ft, 2);
    blob.joint("mTorso", 2, 1)
        .rot_key_with_offset(3.0 * ft, from_euler(pose, RotationOrder::XZY), offset_rot)
        .i32(0)
        .i32(0);

    let mut skel = Skeleton::new();
    skel.set_offset_matrix("mTorso", offset).unwrap();
    read_animation(Cur::new(blob.bytes()), &mut skel).unwrap();
    assert_close(skel.joints[ABDOMEN].keys[2].rot, pose, 0.01);

    // Decoded against the default rig, the same key comes out different.
    let (skel, res) = decode(&blob);
    res.unwrap();
    assert!((skel.joints[ABDOMEN].keys[2].rot - pose).magnitude() > 1.0);
}

#[test]
fn test_interpolated_frames_move_monotonically() {
    let ft = 0.1;
    let target = Quaternion::from_axis_angle(vec3(1.0, 2.0, -0.5).normalize(), Deg(80.0));
    let mut blob = hip_blob(1.0, ft, 2);
    // Implicitly identity on frame 1, keyed on frame 5.
    blob.joint("mTorso", 2, 1)
        .rot_key(5.0 * ft, target)
        .i32(0)
        .i32(0);
    let (skel, res) = decode(&blob);
    res.unwrap();

    let order = skel.joints[ABDOMEN].order;
    let keys = &skel.joints[ABDOMEN].keys;
    let dist = |frame: usize| angle_between(Quaternion::one(), from_euler(keys[frame - 1].rot, order));

    let mut prev = 0.0;
    for frame in 2..5 {
        assert!(keys[frame - 1].ignore_rot);
        let d = dist(frame);
        assert!(d > prev, "frame {} at {} after {}", frame, d, prev);
        assert!((d - 80.0 * (frame - 1) as f64 / 4.0).abs() < 0.05);
        prev = d;
    }

    // The keyed frame is the decoded value itself.
    assert!(!keys[4].ignore_rot);
    assert!(angle_between(from_euler(keys[4].rot, order), target) < 0.01);
    assert!((dist(5) - 80.0).abs() < 0.01);
}

#[test]
fn test_interpolation_between_two_keys() {
    let ft = 0.1;
    let a = vec3(0.0, 30.0, 0.0);
    let b = vec3(0.0, 60.0, 0.0);
    let mut blob = hip_blob(1.0, ft, 2);
    blob.joint("mHead", 1, 2)
        .euler_key(2.0 * ft, a, RotationOrder::XZY)
        .euler_key(5.0 * ft, b, RotationOrder::XZY)
        .i32(0)
        .i32(0);
    let (skel, res) = decode(&blob);
    res.unwrap();

    let keys = &skel.joints[HEAD].keys;
    assert_close(keys[1].rot, a, 0.01);
    assert_close(keys[2].rot, vec3(0.0, 40.0, 0.0), 0.01);
    assert_close(keys[3].rot, vec3(0.0, 50.0, 0.0), 0.01);
    assert_close(keys[4].rot, b, 0.01);
    assert!(keys[2].ignore_rot && keys[3].ignore_rot);
    assert!(!keys[1].ignore_rot && !keys[4].ignore_rot);
    // Past the last key, frames keep their defaults.
    assert_eq!(keys[5].rot, vec3(0.0, 0.0, 0.0));
}

#[test]
fn test_position_at_quantizer_bound() {
    let ft = 0.1;
    let mut blob = Blob::with_header(1, 0, 1.0, 1);
    blob.joint("mPelvis", 4, 1)
        .rot_key(2.0 * ft, Quaternion::one())
        .i32(1)
        .pos_key_raw(2.0 * ft, [65535, 32768, 32768])
        .i32(0);
    let (skel, res) = decode(&blob);
    res.unwrap();

    // +x in the stored frame is +z in the output frame.
    let expected = vec3(0.0, 43.5285, MAX_PELVIS_OFFSET / INCHES_TO_METERS);
    assert_close(skel.joints[HIP].keys[1].pos, expected, 1e-9);
    assert!((expected.z - 196.8500).abs() < 1e-3);
}

#[test]
fn test_positions_are_linearly_interpolated() {
    let ft = 0.1;
    let target = vec3(6.0, 40.0, -3.0);
    let mut blob = Blob::with_header(1, 0, 1.0, 1);
    blob.joint("mPelvis", 4, 1)
        .rot_key(2.0 * ft, Quaternion::one())
        .i32(1)
        .pos_key(4.0 * ft, target)
        .i32(0);
    let (skel, res) = decode(&blob);
    res.unwrap();

    let keys = &skel.joints[HIP].keys;
    let rest = rest_offset();
    assert_close(keys[3].pos, target, 0.01);
    assert_close(keys[1].pos, rest.lerp(keys[3].pos, 1.0 / 3.0), 1e-9);
    assert_close(keys[2].pos, rest.lerp(keys[3].pos, 2.0 / 3.0), 1e-9);
    assert!(keys[1].ignore_pos && keys[2].ignore_pos && !keys[3].ignore_pos);
    assert_eq!(keys[5].pos, rest);
}

#[test]
fn test_unknown_joints_are_stepped_over() {
    let ft = 0.1;
    let mut blob = hip_blob(1.0, ft, 3);
    blob.joint("mTail", 1, 2)
        .euler_key(2.0 * ft, vec3(10.0, 0.0, 0.0), RotationOrder::XYZ)
        .euler_key(3.0 * ft, vec3(20.0, 0.0, 0.0), RotationOrder::XYZ)
        .i32(1)
        .pos_key(2.0 * ft, rest_offset());
    blob.joint("mHead", 1, 1)
        .euler_key(2.0 * ft, vec3(15.0, 0.0, 0.0), RotationOrder::XZY)
        .i32(0)
        .i32(0);
    let (skel, res) = decode(&blob);
    res.unwrap();
    assert_close(skel.joints[HEAD].keys[1].rot, vec3(15.0, 0.0, 0.0), 0.01);
    assert_eq!(skel.joints[HEAD].num_rot_keys, 1);
}

#[test]
fn test_keys_outside_the_motion_are_dropped() {
    let ft = 0.1;
    let mut blob = hip_blob(1.0, ft, 2);
    blob.joint("mTorso", 1, 1)
        .euler_key(0.0, vec3(30.0, 0.0, 0.0), RotationOrder::XZY)
        .i32(1)
        .pos_key(0.0, vec3(1.0, 2.0, 3.0))
        .i32(0);
    let (skel, res) = decode(&blob);
    res.unwrap();
    let keys = &skel.joints[ABDOMEN].keys;
    assert!(keys.iter().all(|k| k.rot == vec3(0.0, 0.0, 0.0)));
    assert!(keys.iter().all(|k| k.pos == vec3(0.0, 0.0, 0.0)));
    assert!(keys[0].ignore_rot);
}

#[test]
fn test_first_key_at_time_zero_is_an_error() {
    let mut blob = Blob::with_header(1, 0, 1.0, 1);
    blob.joint("mPelvis", 4, 1).rot_key(0.0, Quaternion::one()).i32(0).i32(0);
    let (_, res) = decode(&blob);
    assert!(res.is_err());
}

#[test]
fn test_position_before_rotation_is_an_error() {
    let mut blob = Blob::with_header(1, 0, 1.0, 1);
    blob.joint("mPelvis", 4, 0).i32(1).pos_key(0.2, rest_offset()).i32(0);
    let (_, res) = decode(&blob);
    assert!(res.is_err());
}

#[test]
fn test_negative_key_counts_read_as_none() {
    let mut blob = hip_blob(1.0, 0.1, 2);
    blob.joint("mTorso", 1, -3).i32(-1).i32(0);
    let (skel, res) = decode(&blob);
    res.unwrap();
    assert_eq!(skel.joints[ABDOMEN].num_rot_keys, -3);
    assert_eq!(skel.joints[ABDOMEN].num_pos_keys, -1);
}

#[test]
fn test_truncated_input_is_an_error() {
    let mut blob = hip_blob(1.0, 0.1, 1);
    blob.i32(0);
    let full = blob.bytes().len();
    for &len in &[3, 20, full - 12, full - 2] {
        let mut skel = Skeleton::new();
        let res = read_animation(Cur::new(&blob.bytes()[..len]), &mut skel);
        assert!(res.is_err(), "decoded {} of {} bytes", len, full);
    }
}
