pub mod accessories;
pub mod config;
pub mod domain;
pub mod errors;
pub mod recommendation;

pub use accessories::{find_accessories, AccessoryGroups, AccessoryReport};
pub use domain::{
    Accessory, AccessoryKind, AdapterRing, AdapterRingId, Clamp, ClampId, Device, DeviceId,
    FloorStand, FloorStandId, Manufacturer, Mount, MountId, TableMount, TableMountId,
    TableMountStyle, Wheelchair, WheelchairId,
};
pub use errors::{ApplicationError, DomainError, InterfaceError, SelectionFault};
pub use recommendation::{
    tables::MountingSide, Bundle, DeterministicRecommendationEngine, ManufacturerSection,
    MountSelection, RecommendationEngine, RecommendationInput, RecommendationOptions,
};
