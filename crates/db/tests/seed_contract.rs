//! Recommendation scenarios run end to end against the seeded sqlite catalog.

use mountfinder_core::domain::{
    AccessoryKind, AdapterRingId, DeviceId, Manufacturer, MountId, WheelchairId,
};
use mountfinder_core::errors::{ApplicationError, DomainError, SelectionFault};
use mountfinder_core::recommendation::{Bundle, MountSelection, RecommendationOptions};
use mountfinder_core::AccessoryGroups;
use mountfinder_db::{
    check_integrity, connect_with_settings, migrations, CatalogSeedDataset, MountFinder,
    SqlCatalogStore,
};

type ScenarioResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

const QUICKIE_Q500: WheelchairId = WheelchairId(1);
const TOBII_I13: DeviceId = DeviceId(1);
const TOBII_INDI_10: DeviceId = DeviceId(3);
const GRID_PAD_12: DeviceId = DeviceId(4);
const GRID_PAD_18: DeviceId = DeviceId(8);

async fn seeded_finder() -> ScenarioResult<MountFinder<SqlCatalogStore>> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30)
        .await
        .map_err(|e| format!("connect: {e}"))?;
    migrations::run_pending(&pool).await.map_err(|e| format!("migrate: {e}"))?;
    CatalogSeedDataset::load(&pool).await.map_err(|e| format!("seed: {e}"))?;
    Ok(MountFinder::new(SqlCatalogStore::new(pool), AdapterRingId(1)))
}

async fn recommend(
    finder: &MountFinder<SqlCatalogStore>,
    wheelchair: WheelchairId,
    device: DeviceId,
    options: RecommendationOptions,
) -> ScenarioResult<Bundle> {
    finder
        .recommend(wheelchair, device, options)
        .await
        .map_err(|e| format!("recommend({wheelchair}, {device}): {e}"))
}

fn primary_id(bundle: &Bundle, manufacturer: Manufacturer) -> Option<MountId> {
    bundle.section(&manufacturer).and_then(|section| section.primary()).map(|mount| mount.id)
}

#[tokio::test]
async fn heavy_device_right_hand_uses_heavy_duty_and_rigid_mounts() -> ScenarioResult {
    let finder = seeded_finder().await?;
    let bundle =
        recommend(&finder, QUICKIE_Q500, TOBII_I13, RecommendationOptions::default()).await?;

    require_eq!(primary_id(&bundle, Manufacturer::Rehadapt), Some(MountId(3)));
    require_eq!(primary_id(&bundle, Manufacturer::Daessy), Some(MountId(7)));
    require_eq!(bundle.sections[0].manufacturer, Manufacturer::Rehadapt);
    require!(bundle.cross_manufacturer.eligible, "Daessy clamp 3 with Rehadapt mount 3");
    require_eq!(bundle.cross_manufacturer.combinations.len(), 1);
    require!(bundle.hints.iter().any(|hint| hint.contains("M3D Adapter Ring")));
    Ok(())
}

#[tokio::test]
async fn light_device_right_hand_uses_light_mount() -> ScenarioResult {
    let finder = seeded_finder().await?;
    let bundle =
        recommend(&finder, QUICKIE_Q500, TOBII_INDI_10, RecommendationOptions::default()).await?;

    require_eq!(primary_id(&bundle, Manufacturer::Rehadapt), Some(MountId(4)));
    require_eq!(primary_id(&bundle, Manufacturer::Daessy), Some(MountId(10)));
    for section in &bundle.sections {
        let capacities: Vec<f64> = match &section.mounts {
            MountSelection::Ranked(ranked) => {
                ranked.iter().map(|mount| mount.weight_capacity_kg).collect()
            }
            MountSelection::NoSuitableMount { .. } => Vec::new(),
        };
        require!(capacities.iter().all(|capacity| *capacity >= 1.3));
        require!(capacities.windows(2).all(|pair| pair[0] <= pair[1]));
    }
    Ok(())
}

#[tokio::test]
async fn left_hand_side_switches_to_rotation_lock_table() -> ScenarioResult {
    let finder = seeded_finder().await?;
    let options = RecommendationOptions { left_hand_side: true, uses_eyegaze: false };
    let bundle = recommend(&finder, QUICKIE_Q500, GRID_PAD_12, options).await?;

    require_eq!(primary_id(&bundle, Manufacturer::Rehadapt), Some(MountId(2)));
    require!(bundle.side_note.starts_with("Left-hand mounting"));
    Ok(())
}

#[tokio::test]
async fn unknown_wheelchair_is_rejected_without_a_bundle() -> ScenarioResult {
    let finder = seeded_finder().await?;
    let result =
        finder.recommend(WheelchairId(99), TOBII_I13, RecommendationOptions::default()).await;

    require_eq!(
        result,
        Err::<Bundle, ApplicationError>(ApplicationError::Domain(DomainError::InvalidSelection(
            SelectionFault::UnknownWheelchair(WheelchairId(99))
        )))
    );
    Ok(())
}

#[tokio::test]
async fn device_heavier_than_every_daessy_mount_keeps_rehadapt_section() -> ScenarioResult {
    let finder = seeded_finder().await?;
    let bundle =
        recommend(&finder, QUICKIE_Q500, GRID_PAD_18, RecommendationOptions::default()).await?;

    let daessy = bundle.section(&Manufacturer::Daessy).ok_or("daessy section missing")?;
    require!(!daessy.is_complete());
    require!(daessy.mount_error().is_some());
    require_eq!(bundle.mount_errors().len(), 1);

    let rehadapt = bundle.section(&Manufacturer::Rehadapt).ok_or("rehadapt section missing")?;
    require!(rehadapt.is_complete());
    require_eq!(rehadapt.primary().map(|mount| mount.id), Some(MountId(12)));
    require!(bundle.cross_manufacturer.eligible, "fallback primary still bridges");
    Ok(())
}

#[tokio::test]
async fn eyegaze_puts_daessy_first() -> ScenarioResult {
    let finder = seeded_finder().await?;
    let options = RecommendationOptions { left_hand_side: false, uses_eyegaze: true };
    let bundle = recommend(&finder, QUICKIE_Q500, TOBII_I13, options).await?;

    require_eq!(bundle.sections[0].manufacturer, Manufacturer::Daessy);
    require_eq!(bundle.emphasis, Manufacturer::Daessy);
    Ok(())
}

#[tokio::test]
async fn single_manufacturer_wheelchair_is_not_cross_eligible() -> ScenarioResult {
    let finder = seeded_finder().await?;
    let bundle =
        recommend(&finder, WheelchairId(3), TOBII_I13, RecommendationOptions::default()).await?;

    require!(!bundle.cross_manufacturer.eligible);
    require!(bundle.cross_manufacturer.combinations.is_empty());
    Ok(())
}

#[tokio::test]
async fn accessories_and_integrity_over_seed_catalog() -> ScenarioResult {
    let finder = seeded_finder().await?;

    let report = finder
        .find_accessories(TOBII_I13, AccessoryKind::TableMount)
        .await
        .map_err(|e| format!("accessories: {e}"))?;
    require_eq!(report.groups.item_count(), 3);
    require!(matches!(report.groups, AccessoryGroups::TableMount(_)));

    let integrity =
        check_integrity(finder.store()).await.map_err(|e| format!("integrity: {e}"))?;
    require!(integrity.is_clean(), "seed catalog should be clean: {integrity:?}");
    require_eq!(integrity.wheelchairs_checked, 5);
    Ok(())
}
