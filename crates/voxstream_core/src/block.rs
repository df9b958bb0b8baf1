//! # Blocks
//!
//! Block types, the six cube faces and the per-block visible-face mask.

/// Block types in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space, never meshed.
    #[default]
    Air = 0,
    /// Dirt (subsurface layer).
    Dirt = 1,
    /// Grass (surface layer).
    Grass = 2,
    /// Stone (deep layer).
    Stone = 3,
    /// Sand (shoreline surface).
    Sand = 4,
    /// Water (fills below sea level).
    Water = 5,
    /// Wood/log.
    Wood = 6,
    /// Leaves. Solid, but never hides a neighbor's face.
    Leaves = 7,
}

impl BlockType {
    /// Every block type, in id order.
    pub const ALL: [Self; 8] = [
        Self::Air,
        Self::Dirt,
        Self::Grass,
        Self::Stone,
        Self::Sand,
        Self::Water,
        Self::Wood,
        Self::Leaves,
    ];

    /// Returns true for anything but air.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Air)
    }

    /// Returns true if this block hides the face of a block next to it.
    ///
    /// Leaves are see-through: a leaf block never culls its neighbor.
    #[inline]
    #[must_use]
    pub const fn occludes(self) -> bool {
        self.is_solid() && !matches!(self, Self::Leaves)
    }

    /// Converts from u8.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Air),
            1 => Some(Self::Dirt),
            2 => Some(Self::Grass),
            3 => Some(Self::Stone),
            4 => Some(Self::Sand),
            5 => Some(Self::Water),
            6 => Some(Self::Wood),
            7 => Some(Self::Leaves),
            _ => None,
        }
    }
}

/// One of the six axis-aligned cube faces. `z` is up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// +Z
    Top = 0,
    /// -Z
    Bottom = 1,
    /// -X
    Left = 2,
    /// +X
    Right = 3,
    /// +Y
    Front = 4,
    /// -Y
    Back = 5,
}

impl Face {
    /// All faces, in mask-bit order.
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::Front,
        Self::Back,
    ];

    /// Unit step towards the neighbor across this face.
    #[inline]
    #[must_use]
    pub const fn normal(self) -> [i32; 3] {
        match self {
            Self::Top => [0, 0, 1],
            Self::Bottom => [0, 0, -1],
            Self::Left => [-1, 0, 0],
            Self::Right => [1, 0, 0],
            Self::Front => [0, 1, 0],
            Self::Back => [0, -1, 0],
        }
    }

    /// The face on the other side of the cube.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    /// Bit of this face inside a [`FaceMask`].
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// 6-bit mask of the faces currently exposed (and therefore meshed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceMask(u8);

impl FaceMask {
    /// No face exposed.
    pub const EMPTY: Self = Self(0);
    /// Every face exposed.
    pub const ALL: Self = Self(0b11_1111);

    /// Builds a mask from its raw bits (upper bits are dropped).
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if `face` is exposed.
    #[inline]
    #[must_use]
    pub const fn contains(self, face: Face) -> bool {
        self.0 & face.bit() != 0
    }

    /// Marks `face` exposed.
    #[inline]
    pub fn insert(&mut self, face: Face) {
        self.0 |= face.bit();
    }

    /// Marks `face` hidden.
    #[inline]
    pub fn remove(&mut self, face: Face) {
        self.0 &= !face.bit();
    }

    /// Sets `face` to `exposed`.
    #[inline]
    pub fn set(&mut self, face: Face, exposed: bool) {
        if exposed {
            self.insert(face);
        } else {
            self.remove(face);
        }
    }

    /// Returns true if no face is exposed.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of exposed faces.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates the exposed faces in mask-bit order.
    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |face| self.contains(*face))
    }
}

/// A single block in a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    /// Block type.
    pub kind: BlockType,
    /// Faces that must be meshed.
    pub faces: FaceMask,
}

impl Block {
    /// Air block (empty, nothing exposed).
    pub const AIR: Self = Self {
        kind: BlockType::Air,
        faces: FaceMask::EMPTY,
    };

    /// Creates a block with every face exposed (air gets none).
    #[inline]
    #[must_use]
    pub const fn new(kind: BlockType) -> Self {
        let faces = if kind.is_solid() {
            FaceMask::ALL
        } else {
            FaceMask::EMPTY
        };
        Self { kind, faces }
    }

    /// Returns true if this is an air block.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        !self.kind.is_solid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaves_are_solid_but_do_not_occlude() {
        assert!(BlockType::Leaves.is_solid());
        assert!(!BlockType::Leaves.occludes());
        assert!(BlockType::Stone.occludes());
        assert!(BlockType::Water.occludes());
        assert!(!BlockType::Air.is_solid());
        assert!(!BlockType::Air.occludes());
    }

    #[test]
    fn test_face_opposites() {
        for face in Face::ALL {
            assert_eq!(face.opposite().opposite(), face);
            let [x, y, z] = face.normal();
            let [ox, oy, oz] = face.opposite().normal();
            assert_eq!((x + ox, y + oy, z + oz), (0, 0, 0));
        }
    }

    #[test]
    fn test_face_mask_ops() {
        let mut mask = FaceMask::ALL;
        assert_eq!(mask.count(), 6);

        mask.remove(Face::Top);
        mask.remove(Face::Left);
        assert!(!mask.contains(Face::Top));
        assert!(mask.contains(Face::Bottom));
        assert_eq!(mask.count(), 4);

        mask.set(Face::Top, true);
        assert!(mask.contains(Face::Top));

        let faces: Vec<Face> = mask.iter().collect();
        assert_eq!(faces, vec![Face::Top, Face::Bottom, Face::Right, Face::Front, Face::Back]);

        assert_eq!(FaceMask::from_bits(0xFF), FaceMask::ALL);
    }

    #[test]
    fn test_block_id_roundtrip() {
        for kind in BlockType::ALL {
            assert_eq!(BlockType::from_u8(kind as u8), Some(kind));
        }
        assert_eq!(BlockType::from_u8(200), None);
    }
}
