//! Strongly typed hand landmarks and the detector ingestion boundary.
//!
//! Detector payloads are loosely shaped (MediaPipe style JSON, or plain point
//! arrays from a native bridge). They are validated here once, so everything
//! downstream works with [`FrameResult`] and never re-checks shapes. A point
//! that is absent or carries a non-finite coordinate becomes an empty slot in
//! its [`HandObservation`]; the hand still counts as observed.

use crate::constants::LANDMARKS_PER_HAND;
use crate::error::{IngestError, ObservationError};
use glam::Vec3;
use serde::Deserialize;
use smallvec::SmallVec;

/// A single detector-normalized point: x/y roughly in 0..1, z is relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns `None` when any coordinate is NaN or infinite.
    pub fn checked(x: f32, y: f32, z: f32) -> Option<Self> {
        (x.is_finite() && y.is_finite() && z.is_finite()).then_some(Self { x, y, z })
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance in all three axes.
    #[inline]
    pub fn distance(self, other: Landmark) -> f32 {
        self.to_vec3().distance(other.to_vec3())
    }
}

impl From<[f32; 3]> for Landmark {
    fn from(p: [f32; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

/// One detected hand: 21 fixed slots indexed by the landmark constants.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    landmarks: [Option<Landmark>; LANDMARKS_PER_HAND],
}

impl HandObservation {
    /// Build from optional slots; anything past the 21st entry is dropped and
    /// non-finite points are treated as missing.
    pub fn from_slots<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = Option<Landmark>>,
    {
        let mut landmarks = [None; LANDMARKS_PER_HAND];
        for (slot, lm) in landmarks.iter_mut().zip(slots) {
            *slot = lm.and_then(|p| Landmark::checked(p.x, p.y, p.z));
        }
        Self { landmarks }
    }

    pub fn from_points(points: &[[f32; 3]]) -> Self {
        Self::from_slots(points.iter().map(|p| Some(Landmark::from(*p))))
    }

    #[inline]
    pub fn landmark(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied().flatten()
    }

    pub fn require(&self, index: usize) -> Result<Landmark, ObservationError> {
        self.landmark(index)
            .ok_or(ObservationError::MissingLandmark(index))
    }

    pub fn is_complete(&self) -> bool {
        self.landmarks.iter().all(Option::is_some)
    }

    pub fn missing(&self) -> impl Iterator<Item = usize> + '_ {
        self.landmarks
            .iter()
            .enumerate()
            .filter_map(|(i, lm)| lm.is_none().then_some(i))
    }
}

/// Everything the detector reported for one processed camera frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameResult {
    pub hands: SmallVec<[HandObservation; 2]>,
}

impl FrameResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_hands<I>(hands: I) -> Self
    where
        I: IntoIterator<Item = HandObservation>,
    {
        Self {
            hands: hands.into_iter().collect(),
        }
    }

    pub fn from_points(hands: &[Vec<[f32; 3]>]) -> Self {
        Self::from_hands(hands.iter().map(|h| HandObservation::from_points(h)))
    }

    /// Parse a detector payload: either `{"multiHandLandmarks": [...]}` or a
    /// bare array of hands, each a list of `{x, y, z}` objects or `[x, y, z]`
    /// triples. `null` in place of the list means no hands.
    pub fn from_json(payload: &str) -> Result<Self, IngestError> {
        let raw: Option<RawFrame> = serde_json::from_str(payload)?;
        let hands = match raw {
            None => Vec::new(),
            Some(RawFrame::Hands(hands)) => hands,
            Some(RawFrame::Results {
                multi_hand_landmarks,
            }) => multi_hand_landmarks.unwrap_or_default(),
        };
        Ok(Self::from_hands(hands.into_iter().map(|points| {
            HandObservation::from_slots(points.into_iter().map(|p| p.and_then(RawPoint::into_landmark)))
        })))
    }

    #[inline]
    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    pub fn primary(&self) -> Option<&HandObservation> {
        self.hands.first()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFrame {
    Hands(Vec<Vec<Option<RawPoint>>>),
    Results {
        #[serde(rename = "multiHandLandmarks", default)]
        multi_hand_landmarks: Option<Vec<Vec<Option<RawPoint>>>>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Named {
        x: Option<f32>,
        y: Option<f32>,
        #[serde(default)]
        z: Option<f32>,
    },
    Triple(Vec<Option<f32>>),
}

impl RawPoint {
    fn into_landmark(self) -> Option<Landmark> {
        match self {
            RawPoint::Named { x, y, z } => Landmark::checked(x?, y?, z.unwrap_or(0.0)),
            RawPoint::Triple(v) => {
                let x = (*v.first()?)?;
                let y = (*v.get(1)?)?;
                let z = v.get(2).copied().flatten().unwrap_or(0.0);
                Landmark::checked(x, y, z)
            }
        }
    }
}
