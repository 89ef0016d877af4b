macro_rules! catalog_id {
    ($name:ident) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub mod accessory;
pub mod device;
pub mod hardware;
pub mod manufacturer;
pub mod wheelchair;

pub use accessory::{
    Accessory, AccessoryKind, FloorStand, FloorStandId, TableMount, TableMountId, TableMountStyle,
};
pub use device::{validate_weight, Device, DeviceId};
pub use hardware::{AdapterRing, AdapterRingId, Clamp, ClampId, Mount, MountId};
pub use manufacturer::Manufacturer;
pub use wheelchair::{parse_frame_clamp_ids, Wheelchair, WheelchairId};
