//! A small but realistic mod directory for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const SHIPS: &str = "id,name,tech/manufacturer,designation,system id\r\n\
#frigates,,,,\r\n\
wasp,Wasp,Low Tech,Fighter,burn\r\n\
,Nameless,,,\r\n\
\r\n\
hammer,Hammerhead,Midline,Destroyer,\r\n";

pub const WEAPONS: &str = "\
id,name,tech/manufacturer,primaryRoleStr,accuracyStr,speedStr,trackingStr,turnRateStr,customPrimary,customPrimaryHL,hints
#ballistic,,,,,,,,,,
flak,Flak Cannon,Common,Point Defense,Poor,Fast,,Fast,Deals %s damage,fire,PD
lidar,Lidar Array,High Tech,Special,Excellent,,,Slow,,,SYSTEM
";

pub const SYSTEMS: &str = "id,name\nburn,Burn Drive\n";

pub const DESCRIPTIONS: &str = "\
id,type,text1,text2,text3,text4
# faction and resource rows,,,,,
wasp,SHIP,\"A small, fast hull.\nBuilt in numbers.\",Fast,Wasp wing,
flak,WEAPON,Shreds missiles.,Close range only.,,
burn,SHIP_SYSTEM,Boosts top speed.,Mobility,Boosts speed greatly,speed
pirates,FACTION,Raiders of the sector.,,,
ore,RESOURCE,Raw ore.,,,
banner,CUSTOM,Some custom text.,,,
,SHIP,Orphan row,,,
";

pub const MOD_INFO: &str = r#"{
    # Mod metadata
    "id": "test_mod",
    "name": "Test Mod",
    "author": "Someone",
    "version": {"major": 1, "minor": 2, "patch": 0},
    "description": "A mod # with a hash",
    "gameVersion": "0.97a",
}
"#;

/// Relative paths of every file written by [`write_mod`], in apply order.
pub const FILES: [&str; 5] = [
    "data/strings/descriptions.csv",
    "data/weapons/weapon_data.csv",
    "data/shipsystems/ship_systems.csv",
    "data/hulls/ship_data.csv",
    "mod_info.json",
];

/// Write a mod with the given ship system table.
pub fn write_mod_with_systems(systems: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let contents = [DESCRIPTIONS, WEAPONS, systems, SHIPS, MOD_INFO];
    for (relative, content) in FILES.iter().zip(contents) {
        let path = temp.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
    temp
}

pub fn write_mod() -> TempDir {
    write_mod_with_systems(SYSTEMS)
}

/// Bytes of every mod file, keyed by relative path.
pub fn snapshot(root: &Path) -> BTreeMap<&'static str, Vec<u8>> {
    FILES
        .iter()
        .map(|relative| (*relative, std::fs::read(root.join(relative)).unwrap()))
        .collect()
}

pub fn path(root: &Path, relative: &str) -> PathBuf {
    root.join(relative)
}
