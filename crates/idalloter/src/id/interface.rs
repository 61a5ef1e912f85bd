use core::{fmt, hash::Hash};

/// The three fields packed into every Snowflake ID.
///
/// This is the decoded form returned by [`unpack`] and
/// [`SnowflakeId::to_parts`]. It carries no layout information of its own;
/// each field is the raw, unshifted value.
///
/// [`unpack`]: crate::id::unpack
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdParts {
    /// Milliseconds since the generator's epoch.
    pub timestamp: u64,
    /// The instance that minted the ID.
    pub machine_id: u64,
    /// Position of the ID within its millisecond.
    pub sequence: u64,
}

/// A 64-bit Snowflake layout with separate bit fields for timestamp, machine
/// ID, and sequence, ordered from most to least significant.
///
/// Implementors only declare the field widths and how to convert to and from
/// the raw `u64`; every accessor and constructor is derived from those. Use
/// [`define_snowflake_id!`] rather than implementing this by hand: the macro
/// also checks at compile time that the layout leaves the sign bit clear.
///
/// # Example
///
/// ```
/// use idalloter::{FleetId, SnowflakeId};
///
/// let id = FleetId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.machine_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// ```
///
/// [`define_snowflake_id!`]: crate::define_snowflake_id
pub trait SnowflakeId:
    Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Width of the timestamp field.
    const TIMESTAMP_BITS: u32;

    /// Width of the machine ID field.
    const MACHINE_ID_BITS: u32;

    /// Width of the sequence field.
    const SEQUENCE_BITS: u32;

    /// The sequence occupies the least significant bits.
    const SEQUENCE_SHIFT: u32 = 0;

    /// The machine ID sits directly above the sequence.
    const MACHINE_ID_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// The timestamp sits directly above the machine ID.
    const TIMESTAMP_SHIFT: u32 = Self::SEQUENCE_BITS + Self::MACHINE_ID_BITS;

    /// Converts this type into its raw representation.
    fn to_raw(&self) -> u64;

    /// Converts a raw value into this type without validation.
    fn from_raw(raw: u64) -> Self;

    /// Returns the maximum possible value for the timestamp field.
    fn max_timestamp() -> u64 {
        mask(Self::TIMESTAMP_BITS)
    }

    /// Returns the maximum possible value for the machine ID field.
    fn max_machine_id() -> u64 {
        mask(Self::MACHINE_ID_BITS)
    }

    /// Returns the maximum possible value for the sequence field.
    fn max_sequence() -> u64 {
        mask(Self::SEQUENCE_BITS)
    }

    /// Returns the timestamp portion of the ID.
    fn timestamp(&self) -> u64 {
        (self.to_raw() >> Self::TIMESTAMP_SHIFT) & Self::max_timestamp()
    }

    /// Returns the machine ID portion of the ID.
    fn machine_id(&self) -> u64 {
        (self.to_raw() >> Self::MACHINE_ID_SHIFT) & Self::max_machine_id()
    }

    /// Returns the sequence portion of the ID.
    fn sequence(&self) -> u64 {
        (self.to_raw() >> Self::SEQUENCE_SHIFT) & Self::max_sequence()
    }

    /// Packs the three components into an ID.
    ///
    /// Each component is masked to its field width so an out-of-range value
    /// can never bleed into a neighbouring field. Debug builds assert instead.
    fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::max_timestamp(), "timestamp overflow");
        debug_assert!(machine_id <= Self::max_machine_id(), "machine_id overflow");
        debug_assert!(sequence <= Self::max_sequence(), "sequence overflow");
        let timestamp = (timestamp & Self::max_timestamp()) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id & Self::max_machine_id()) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence & Self::max_sequence()) << Self::SEQUENCE_SHIFT;
        Self::from_raw(timestamp | machine_id | sequence)
    }

    /// Decodes the ID into its components.
    fn to_parts(&self) -> IdParts {
        IdParts {
            timestamp: self.timestamp(),
            machine_id: self.machine_id(),
            sequence: self.sequence(),
        }
    }

    /// Returns true if the current sequence value can be incremented.
    fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns a new ID with the sequence incremented.
    fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.machine_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.machine_id(), 0)
    }
}

const fn mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}
