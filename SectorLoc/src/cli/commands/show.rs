//! CLI command for printing a mod's records

use std::path::Path;

use anyhow::{Context, bail};
use console::style;

use crate::config::Config;
use crate::entity::{EntityRecord, ModData, ModPaths, load_mod};
use crate::highlight::DisplayMarkup;
use crate::schema::EntityType;

pub fn execute(mod_dir: &Path, entity_type: &str, id: Option<&str>) -> anyhow::Result<()> {
    let Some(entity_type) = EntityType::from_tag(&entity_type.to_uppercase()) else {
        let known: Vec<&str> = EntityType::ALL.iter().map(|t| t.tag()).collect();
        bail!("Unknown type '{entity_type}'. Valid values: {}", known.join(", "));
    };

    let paths = ModPaths::new(mod_dir);
    let config = Config::load_for_mod(&paths.root)
        .with_context(|| format!("Failed to load configuration for {}", mod_dir.display()))?;
    let markup = config.display_markup();
    let data = load_mod(&paths, &config.encoding_policy()?);

    if entity_type == EntityType::ModMeta {
        return show_metadata(&data);
    }

    let mut shown = 0;
    for record in data.records(entity_type).filter(|r| id.is_none_or(|id| r.id == id)) {
        print_record(record, &markup);
        shown += 1;
    }

    if entity_type == EntityType::Ship {
        for skin in data.skins.iter().filter(|s| id.is_none_or(|id| s.skin_id == id)) {
            let view = data.skin_view(skin);
            println!(
                "{} {}",
                style(&skin.skin_id).bold(),
                style(format!("(skin of {})", skin.base_hull_id)).dim()
            );
            print_line("hull_name", view.hull_name());
            print_line("manufacturer", view.manufacturer());
            print_line("ship_system", view.ship_system());
            print_line("description", Some(view.full_description().as_str()));
            println!();
            shown += 1;
        }
    }

    if shown == 0 {
        match id {
            Some(id) => bail!("No {entity_type} with id '{id}' in {}", mod_dir.display()),
            None => println!("No {entity_type} records in {}", mod_dir.display()),
        }
    }
    Ok(())
}

fn print_record(record: &EntityRecord, markup: &DisplayMarkup) {
    println!("{}", style(&record.id).bold());
    for name in record.fields.keys() {
        print_line(name, record.display(name, markup).as_deref());
    }
    println!();
}

fn print_line(name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        println!("  {}: {}", style(name).cyan(), value);
    }
}

fn show_metadata(data: &ModData) -> anyhow::Result<()> {
    let Some(meta) = &data.metadata else {
        bail!("No readable mod_info.json in {}", data.paths.root.display());
    };
    println!("{}", style(&meta.id).bold());
    print_line("name", Some(meta.name.as_str()));
    print_line("version", meta.version.as_deref());
    print_line("gameVersion", Some(meta.game_version.as_str()));
    print_line("author", Some(meta.author.as_str()));
    print_line("description", Some(meta.description.as_str()));
    Ok(())
}
