use crate::id::{IdParts, SnowflakeId};

/// Declares a `u64` newtype implementing [`SnowflakeId`] with the given field
/// widths.
///
/// The widths must leave the most significant bit unused so IDs stay positive
/// when stored in signed 64-bit columns. This is checked at compile time.
///
/// ```
/// use idalloter::{SnowflakeId, define_snowflake_id};
///
/// define_snowflake_id!(
///     /// 8 IDs per millisecond, 256 machines.
///     pub SmallShardId, timestamp: 41, machine_id: 8, sequence: 3
/// );
///
/// assert_eq!(SmallShardId::max_sequence(), 7);
/// assert_eq!(SmallShardId::from_components(1, 0, 0).to_raw(), 1 << 11);
/// ```
///
/// ```compile_fail
/// idalloter::define_snowflake_id!(TooWide, timestamp: 42, machine_id: 10, sequence: 12);
/// ```
#[macro_export]
macro_rules! define_snowflake_id {
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident, timestamp: $ts:expr, machine_id: $mid:expr, sequence: $seq:expr
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name {
            id: u64,
        }

        const _: () = assert!(
            $ts + $mid + $seq <= 63,
            "layout must leave the sign bit clear"
        );

        impl $crate::SnowflakeId for $name {
            const TIMESTAMP_BITS: u32 = $ts;
            const MACHINE_ID_BITS: u32 = $mid;
            const SEQUENCE_BITS: u32 = $seq;

            fn to_raw(&self) -> u64 {
                self.id
            }

            fn from_raw(raw: u64) -> Self {
                Self { id: raw }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.id, f)
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("id", &self.id)
                    .field("timestamp", &$crate::SnowflakeId::timestamp(self))
                    .field("machine_id", &$crate::SnowflakeId::machine_id(self))
                    .field("sequence", &$crate::SnowflakeId::sequence(self))
                    .finish()
            }
        }

        impl ::core::convert::From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.id
            }
        }
    };
}

define_snowflake_id!(
    /// The canonical 64-bit layout minted by this crate.
    ///
    /// - 1 bit reserved (always zero)
    /// - 41 bits timestamp (ms since the generator's epoch, ~69 years)
    /// - 10 bits machine ID
    /// - 12 bits sequence
    ///
    /// ```text
    ///  Bit Index:  63           63 62            22 21             12 11             0
    ///              +--------------+----------------+-----------------+---------------+
    ///  Field:      | reserved (1) | timestamp (41) | machine ID (10) | sequence (12) |
    ///              +--------------+----------------+-----------------+---------------+
    ///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
    /// ```
    ///
    /// Every consumer decoding these IDs must agree on this layout; it is the
    /// wire contract of the allocator.
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub FleetId, timestamp: 41, machine_id: 10, sequence: 12
);

/// Packs a canonical [`FleetId`] from its components.
///
/// ```
/// let id = idalloter::pack(1, 5, 0);
/// assert_eq!(id, (1 << 22) | (5 << 12));
/// ```
pub fn pack(timestamp: u64, machine_id: u64, sequence: u64) -> u64 {
    FleetId::from_components(timestamp, machine_id, sequence).to_raw()
}

/// Splits a canonical [`FleetId`] into its components.
///
/// ```
/// let parts = idalloter::unpack(idalloter::pack(7, 1023, 4095));
/// assert_eq!((parts.timestamp, parts.machine_id, parts.sequence), (7, 1023, 4095));
/// ```
pub fn unpack(id: u64) -> IdParts {
    FleetId::from_raw(id).to_parts()
}
