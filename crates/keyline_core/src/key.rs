// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe kinds and payloads.

use crate::mesh::MeshBuffer;
use crate::serial::{Deserializer, SerialResult, Serializer};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Easing curve families selectable per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EasingCurve {
    /// No easing.
    #[default]
    Linear,
    /// Sinusoidal in/out.
    Sine,
    /// Quadratic in/out.
    Quad,
    /// Cubic in/out.
    Cubic,
    /// Exponential in/out.
    Expo,
}

impl EasingCurve {
    /// Decode a serialized curve id.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::Linear),
            1 => Some(Self::Sine),
            2 => Some(Self::Quad),
            3 => Some(Self::Cubic),
            4 => Some(Self::Expo),
            _ => None,
        }
    }

    /// Serialized curve id.
    pub fn id(self) -> i32 {
        match self {
            Self::Linear => 0,
            Self::Sine => 1,
            Self::Quad => 2,
            Self::Cubic => 3,
            Self::Expo => 4,
        }
    }
}

/// Easing parameter stored on every key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EasingParam {
    /// Curve family.
    pub curve: EasingCurve,
    /// Blend weight in `[0, 1]`.
    pub weight: f32,
}

impl Default for EasingParam {
    fn default() -> Self {
        Self {
            curve: EasingCurve::Linear,
            weight: 1.0,
        }
    }
}

impl EasingParam {
    /// Rebuild from serialized parts, rejecting malformed input.
    pub fn from_parts(curve_id: i32, weight: f32) -> Option<Self> {
        let curve = EasingCurve::from_id(curve_id)?;
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return None;
        }
        Some(Self { curve, weight })
    }
}

/// Payload of a free-form-deformation key: an easing parameter plus
/// the deformed mesh vertex positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FfdKeyData {
    /// Easing into the next key.
    pub easing: EasingParam,
    /// Deformed mesh vertex positions.
    pub mesh: MeshBuffer,
}

impl FfdKeyData {
    /// Write easing, vertex count, then the raw position array.
    pub fn serialize<W: Write>(&self, out: &mut Serializer<W>) -> SerialResult<()> {
        out.write_i32(self.easing.curve.id());
        out.write_f32(self.easing.weight);

        out.write_i32(self.mesh.count() as i32);
        if self.mesh.count() > 0 {
            out.write_vector3_array(self.mesh.positions());
        }

        out.check_stream()
    }

    /// Read the payload back, replacing the current contents.
    ///
    /// A vertex count of zero means an explicitly empty mesh. Errors
    /// are attributed to the `FfdKey` diagnostic scope.
    pub fn deserialize<R: Read>(&mut self, input: &mut Deserializer<R>) -> SerialResult<()> {
        input.push_log_scope("FfdKey");

        let curve_id = match input.read_i32() {
            Ok(id) => id,
            Err(_) => return Err(input.errored("invalid easing param")),
        };
        let weight = match input.read_f32() {
            Ok(weight) => weight,
            Err(_) => return Err(input.errored("invalid easing param")),
        };
        let Some(easing) = EasingParam::from_parts(curve_id, weight) else {
            return Err(input.errored("invalid easing param"));
        };
        self.easing = easing;

        let count = input.read_i32()?;
        if count < 0 {
            return Err(input.errored("negative vertex count"));
        }
        if count > 0 {
            self.mesh.alloc(count as usize);
            input.read_vector3_array(self.mesh.positions_mut())?;
        } else {
            self.mesh.clear();
        }

        input.pop_log_scope();
        input.check_stream()
    }
}

/// The timeline lanes a node can hold keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    /// Translation keys.
    Move,
    /// Rotation keys.
    Rotate,
    /// Scaling keys.
    Scale,
    /// Opacity keys.
    Opacity,
    /// Free-form-deformation mesh keys.
    Ffd,
}

impl KeyKind {
    /// All lanes in display order.
    pub const ALL: [KeyKind; 5] = [
        KeyKind::Move,
        KeyKind::Rotate,
        KeyKind::Scale,
        KeyKind::Opacity,
        KeyKind::Ffd,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move => "Move",
            Self::Rotate => "Rotate",
            Self::Scale => "Scale",
            Self::Opacity => "Opacity",
            Self::Ffd => "FFD",
        }
    }
}

/// A keyframe value on one timeline lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Key {
    /// Translation.
    Move {
        /// Position in world units.
        pos: [f32; 2],
        /// Easing into the next key.
        easing: EasingParam,
    },
    /// Rotation.
    Rotate {
        /// Angle in radians.
        angle: f32,
        /// Easing into the next key.
        easing: EasingParam,
    },
    /// Scaling.
    Scale {
        /// Per-axis scale factors.
        scale: [f32; 2],
        /// Easing into the next key.
        easing: EasingParam,
    },
    /// Opacity.
    Opacity {
        /// Opacity in `[0, 1]`.
        value: f32,
        /// Easing into the next key.
        easing: EasingParam,
    },
    /// Free-form deformation.
    Ffd(FfdKeyData),
}

impl Key {
    /// The lane this key belongs to.
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Move { .. } => KeyKind::Move,
            Self::Rotate { .. } => KeyKind::Rotate,
            Self::Scale { .. } => KeyKind::Scale,
            Self::Opacity { .. } => KeyKind::Opacity,
            Self::Ffd(_) => KeyKind::Ffd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffd_with_mesh(positions: &[crate::mesh::Vector3]) -> FfdKeyData {
        let mut data = FfdKeyData {
            easing: EasingParam {
                curve: EasingCurve::Cubic,
                weight: 0.25,
            },
            ..FfdKeyData::default()
        };
        if !positions.is_empty() {
            data.mesh.alloc_and_write(positions);
        }
        data
    }

    #[test]
    fn test_ffd_serialize_round_trip() {
        let source = ffd_with_mesh(&[[0.0, 1.0, 2.0], [3.0, 4.0, 5.0], [-1.0, -2.0, -3.0]]);

        let mut bytes = Vec::new();
        let mut out = Serializer::new(&mut bytes);
        source.serialize(&mut out).unwrap();

        let mut read = FfdKeyData::default();
        let mut input = Deserializer::new(bytes.as_slice());
        read.deserialize(&mut input).unwrap();

        assert_eq!(read.easing, source.easing);
        assert_eq!(read.mesh.positions(), source.mesh.positions());
    }

    #[test]
    fn test_ffd_round_trip_empty_mesh() {
        let source = ffd_with_mesh(&[]);

        let mut bytes = Vec::new();
        let mut out = Serializer::new(&mut bytes);
        source.serialize(&mut out).unwrap();

        // deserializing into a populated payload must end up empty
        let mut read = ffd_with_mesh(&[[9.0; 3], [8.0; 3]]);
        let mut input = Deserializer::new(bytes.as_slice());
        read.deserialize(&mut input).unwrap();

        assert_eq!(read.easing, source.easing);
        assert_eq!(read.mesh.count(), 0);
    }

    #[test]
    fn test_ffd_deserialize_bad_easing() {
        // truncated before the easing parameter completes
        let mut read = FfdKeyData::default();
        let mut input = Deserializer::new([0u8, 0].as_slice());
        let error = read.deserialize(&mut input).unwrap_err();
        assert!(error.to_string().contains("FfdKey"));
        assert!(error.to_string().contains("invalid easing param"));
        assert_eq!(read.mesh.count(), 0);

        // curve id outside the known range
        let mut bytes = Vec::new();
        let mut out = Serializer::new(&mut bytes);
        out.write_i32(99);
        out.write_f32(0.5);
        out.write_i32(0);
        out.check_stream().unwrap();

        let mut input = Deserializer::new(bytes.as_slice());
        let error = read.deserialize(&mut input).unwrap_err();
        assert!(error.to_string().contains("invalid easing param"));
    }

    #[test]
    fn test_ffd_deserialize_negative_count() {
        let mut bytes = Vec::new();
        let mut out = Serializer::new(&mut bytes);
        out.write_i32(EasingCurve::Linear.id());
        out.write_f32(1.0);
        out.write_i32(-5);
        out.check_stream().unwrap();

        let mut read = FfdKeyData::default();
        let mut input = Deserializer::new(bytes.as_slice());
        let error = read.deserialize(&mut input).unwrap_err();
        assert!(error.to_string().contains("negative vertex count"));
    }

    #[test]
    fn test_key_kind() {
        let key = Key::Ffd(FfdKeyData::default());
        assert_eq!(key.kind(), KeyKind::Ffd);
        assert_eq!(KeyKind::Ffd.name(), "FFD");
    }

    #[test]
    fn test_key_ron_round_trip() {
        let key = Key::Move {
            pos: [4.0, -2.0],
            easing: EasingParam::default(),
        };
        let text = ron::ser::to_string_pretty(&key, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: Key = ron::from_str(&text).unwrap();
        assert_eq!(loaded, key);
    }
}
