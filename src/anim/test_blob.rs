//! Builds `.anim` byte buffers for tests.

use anim::{MAX_PELVIS_OFFSET, INCHES_TO_METERS};
use cgmath::{One, Quaternion, Vector3};
use rotation::{self, RotationOrder};
use skeleton::{rest_offset, rig_frame_matrix};
use util::quantize::quantize_u16;

pub struct Blob {
    pub buf: Vec<u8>,
    pub duration: f64,
}

impl Blob {
    /// A header with the given version and joint count; everything else is
    /// filler.
    pub fn with_header(version: u16, sub_version: u16, duration: f32, num_joints: u32) -> Blob {
        let mut blob = Blob { buf: vec![], duration: duration as f64 };
        blob.u16(version).u16(sub_version)
            .i32(3)
            .f32(duration)
            .cstr("")
            .f32(0.0).f32(duration)
            .i32(1)
            .f32(0.25).f32(0.5)
            .u32(0)
            .u32(num_joints);
        blob
    }

    pub fn u16(&mut self, x: u16) -> &mut Blob {
        self.buf.extend_from_slice(&[x as u8, (x >> 8) as u8]);
        self
    }

    pub fn u32(&mut self, x: u32) -> &mut Blob {
        self.buf.extend_from_slice(&[x as u8, (x >> 8) as u8, (x >> 16) as u8, (x >> 24) as u8]);
        self
    }

    pub fn i32(&mut self, x: i32) -> &mut Blob {
        self.u32(x as u32)
    }

    pub fn f32(&mut self, x: f32) -> &mut Blob {
        self.u32(x.to_bits())
    }

    pub fn cstr(&mut self, s: &str) -> &mut Blob {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        self
    }

    pub fn joint(&mut self, out_name: &str, priority: i32, num_rot_keys: i32) -> &mut Blob {
        self.cstr(out_name).i32(priority).i32(num_rot_keys)
    }

    pub fn time(&mut self, seconds: f64) -> &mut Blob {
        let duration = self.duration;
        self.u16(quantize_u16(seconds, 0.0, duration))
    }

    /// A rotation key holding the stored form of `in_rot` for a joint with
    /// the rig's frame and an identity offset.
    pub fn rot_key(&mut self, seconds: f64, in_rot: Quaternion<f64>) -> &mut Blob {
        self.rot_key_with_offset(seconds, in_rot, Quaternion::one())
    }

    pub fn rot_key_with_offset(&mut self, seconds: f64, in_rot: Quaternion<f64>, offset_rot: Quaternion<f64>) -> &mut Blob {
        let out = rotation::retarget(in_rot, rig_frame(), offset_rot);
        let v = rotation::pack_to_vector3(out);
        self.time(seconds)
            .u16(quantize_u16(v.x, -1.0, 1.0))
            .u16(quantize_u16(v.y, -1.0, 1.0))
            .u16(quantize_u16(v.z, -1.0, 1.0))
    }

    pub fn euler_key(&mut self, seconds: f64, angles: Vector3<f64>, order: RotationOrder) -> &mut Blob {
        self.rot_key(seconds, rotation::from_euler(angles, order))
    }

    /// A position key for the root at `pos`, given in output units.
    pub fn pos_key(&mut self, seconds: f64, pos: Vector3<f64>) -> &mut Blob {
        let stored = rig_frame() * (pos - rest_offset()) * INCHES_TO_METERS;
        self.pos_key_raw(seconds, [
            quantize_u16(stored.x, -MAX_PELVIS_OFFSET, MAX_PELVIS_OFFSET),
            quantize_u16(stored.y, -MAX_PELVIS_OFFSET, MAX_PELVIS_OFFSET),
            quantize_u16(stored.z, -MAX_PELVIS_OFFSET, MAX_PELVIS_OFFSET),
        ])
    }

    pub fn pos_key_raw(&mut self, seconds: f64, xyz: [u16; 3]) -> &mut Blob {
        self.time(seconds).u16(xyz[0]).u16(xyz[1]).u16(xyz[2])
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }
}

pub fn rig_frame() -> Quaternion<f64> {
    rotation::matrix_rotation(rig_frame_matrix())
}
