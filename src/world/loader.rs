use log::warn;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use super::model::{Direction, GameMap, RoomTemplate, TemplateCatalog};
use super::validator::{ValidationError, validate_catalog};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template id may not be empty")]
    EmptyId,

    #[error("duplicate template id: {0}")]
    DuplicateTemplate(String),

    #[error("template '{template}': {reason}")]
    BadDirection { template: String, reason: String },

    #[error("catalog failed validation: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

////////////////////////
/// CATALOG STRUCTS  ///
////////////////////////

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    catalog: Option<CatalogHeader>,
    #[serde(default)]
    template: Vec<TemplateConfig>, // [[template]] blocks
}

#[derive(Deserialize)]
struct CatalogHeader {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct TemplateConfig {
    id: String,

    #[serde(default)]
    name: String,

    #[serde(default, alias = "description")]
    desc: String,

    #[serde(default)]
    exits: Vec<String>,

    #[serde(default)]
    tags: Vec<String>,

    #[serde(default)]
    items: Vec<String>,

    #[serde(default)]
    entities: Vec<String>,

    #[serde(default)]
    details: BTreeMap<String, DetailConfig>, // [template.details]

    #[serde(default)]
    door_levels: BTreeMap<String, u8>, // door_levels = { east = 1 }
}

/// Details are either plain text or a table carrying a description.
#[derive(Deserialize)]
#[serde(untagged)]
enum DetailConfig {
    Text(String),
    Table {
        #[serde(alias = "desc")]
        description: String,
    },
}

impl DetailConfig {
    fn into_text(self) -> String {
        match self {
            DetailConfig::Text(s) => s,
            DetailConfig::Table { description } => description,
        }
    }
}

///////////////////////////
/// CATALOG LOADERS     ///
///////////////////////////

/// Load a catalog from disk. Files ending in `.json` use the JSON list format,
/// everything else is read as TOML.
pub fn load_catalog_from_file(path: &Path) -> Result<TemplateCatalog, LoadError> {
    let contents = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        load_catalog_from_json_str(&name, &contents)
    } else {
        load_catalog_from_str(&contents)
    }
}

/// Load a catalog from TOML text.
pub fn load_catalog_from_str(contents: &str) -> Result<TemplateCatalog, LoadError> {
    let file: CatalogFile = toml::from_str(contents)?;
    let name = file.catalog.map(|h| h.name).unwrap_or_default();
    build_catalog(name, file.template)
}

/// Load a catalog from a JSON array of template records.
pub fn load_catalog_from_json_str(
    name: &str,
    contents: &str,
) -> Result<TemplateCatalog, LoadError> {
    let configs: Vec<TemplateConfig> = serde_json::from_str(contents)?;
    build_catalog(name.to_string(), configs)
}

/// Load a previously exported map (JSON).
pub fn load_map_from_file(path: &Path) -> Result<GameMap, LoadError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn build_catalog(name: String, configs: Vec<TemplateConfig>) -> Result<TemplateCatalog, LoadError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut templates: Vec<RoomTemplate> = Vec::with_capacity(configs.len());

    for cfg in configs {
        let id = cfg.id.trim().to_string();
        if id.is_empty() {
            return Err(LoadError::EmptyId);
        }
        if !seen.insert(id.clone()) {
            return Err(LoadError::DuplicateTemplate(id));
        }

        let mut exits: BTreeSet<Direction> = BTreeSet::new();
        for raw in &cfg.exits {
            let dir = parse_direction(&id, raw)?;
            if !exits.insert(dir) {
                warn!("template '{}' lists exit '{}' more than once", id, dir);
            }
        }

        if exits.is_empty() {
            warn!("template '{}' declares no exits and can only stand alone", id);
        }

        let mut door_levels: BTreeMap<Direction, u8> = BTreeMap::new();
        for (raw, level) in cfg.door_levels {
            door_levels.insert(parse_direction(&id, &raw)?, level);
        }

        let name = if cfg.name.trim().is_empty() {
            id.clone()
        } else {
            cfg.name.trim().to_string()
        };

        templates.push(RoomTemplate {
            id,
            name,
            desc: normalize_multiline_desc(&cfg.desc),
            exits,
            tags: cfg.tags.into_iter().map(|t| t.trim().to_string()).collect(),
            items: cfg.items,
            entities: cfg.entities,
            details: cfg
                .details
                .into_iter()
                .map(|(k, v)| (k, normalize_multiline_desc(&v.into_text())))
                .collect(),
            door_levels,
        });
    }

    let catalog = TemplateCatalog::new(name, templates);

    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        return Err(LoadError::Invalid(errors));
    }

    Ok(catalog)
}

fn parse_direction(template: &str, raw: &str) -> Result<Direction, LoadError> {
    raw.parse().map_err(|reason| LoadError::BadDirection {
        template: template.to_string(),
        reason,
    })
}

/// Collapse TOML-indented text: a single newline becomes a space, one blank line a
/// newline, and two or more blank lines a paragraph break.
fn normalize_multiline_desc(raw: &str) -> String {
    let mut result = String::new();
    let mut pending_blank_lines = 0usize;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            pending_blank_lines += 1;
            continue;
        }

        if !result.is_empty() {
            match pending_blank_lines {
                0 => result.push(' '),
                1 => result.push('\n'),
                _ => result.push_str("\n\n"),
            }
        }
        result.push_str(trimmed);
        pending_blank_lines = 0;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
        [catalog]
        name = "small"

        [[template]]
        id = "cell"
        name = "Holding Cell"
        desc = """
            A cramped cell.
            The door is reinforced.

            A camera watches.
        """
        exits = ["east"]
        tags = ["start"]
        door_levels = { east = 1 }

        [template.details]
        bunk = "A thin mattress."
        camera = { description = "Its red light blinks." }

        [[template]]
        id = "hall"
        exits = ["west", "east", "West"]

        [[template]]
        id = "closet"
        exits = ["west"]
        tags = ["end"]
    "#;

    #[test]
    fn loads_toml_catalog() {
        let catalog = load_catalog_from_str(SMALL).unwrap();
        assert_eq!(catalog.name, "small");
        assert_eq!(catalog.len(), 3);

        let cell = catalog.get("cell").unwrap();
        assert_eq!(cell.name, "Holding Cell");
        assert_eq!(
            cell.desc,
            "A cramped cell. The door is reinforced.\nA camera watches."
        );
        assert!(cell.is_start());
        assert_eq!(cell.door_level(Direction::East), 1);
        assert_eq!(cell.details["camera"], "Its red light blinks.");

        // Name falls back to id, duplicated exits collapse.
        let hall = catalog.get("hall").unwrap();
        assert_eq!(hall.name, "hall");
        assert_eq!(hall.exits.len(), 2);
    }

    #[test]
    fn rejects_unknown_direction() {
        let src = r#"
            [[template]]
            id = "cell"
            exits = ["up"]
            tags = ["start"]
        "#;
        match load_catalog_from_str(src) {
            Err(LoadError::BadDirection { template, .. }) => assert_eq!(template, "cell"),
            other => panic!("expected BadDirection, got {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let src = r#"
            [[template]]
            id = "cell"
            exits = ["east"]
            tags = ["start"]

            [[template]]
            id = "cell"
            exits = ["west"]
        "#;
        assert!(matches!(
            load_catalog_from_str(src),
            Err(LoadError::DuplicateTemplate(id)) if id == "cell"
        ));
    }

    #[test]
    fn rejects_catalog_without_start() {
        let src = r#"
            [[template]]
            id = "hall"
            exits = ["west", "east"]
        "#;
        assert!(matches!(load_catalog_from_str(src), Err(LoadError::Invalid(_))));
    }

    #[test]
    fn loads_json_list() {
        let src = r#"[
            {
                "id": "cell",
                "name": "Cell",
                "description": "Grey walls.",
                "exits": ["north"],
                "tags": ["start"]
            },
            {"id": "stair", "exits": ["south"], "tags": ["end"], "entities": ["Guard"]}
        ]"#;
        let catalog = load_catalog_from_json_str("site", src).unwrap();
        assert_eq!(catalog.name, "site");
        assert_eq!(catalog.get("cell").unwrap().desc, "Grey walls.");
        assert_eq!(catalog.get("stair").unwrap().entities, vec!["Guard"]);
    }

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("facility_gen_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn catalog_file_format_follows_extension() {
        let json = scratch_file(
            "site.JSON",
            r#"[{"id": "cell", "exits": ["east"], "tags": ["start"]}]"#,
        );
        let catalog = load_catalog_from_file(&json).unwrap();
        assert_eq!(catalog.name, "site");
        assert!(catalog.get("cell").is_some());

        let toml = scratch_file("site.toml", SMALL);
        assert_eq!(load_catalog_from_file(&toml).unwrap().name, "small");

        // Anything that is not .json goes through the TOML parser.
        let misnamed = scratch_file("site.txt", r#"[{"id": "cell"}]"#);
        assert!(matches!(load_catalog_from_file(&misnamed), Err(LoadError::Toml(_))));

        for path in [json, toml, misnamed] {
            let _ = fs::remove_file(path);
        }
    }

    #[test]
    fn loads_map_with_bare_exit_ids() {
        let path = scratch_file(
            "map.json",
            r#"{
                "start_room": "room_0_0",
                "rooms": {
                    "room_0_0": {
                        "id": "room_0_0",
                        "template_id": "cell",
                        "name": "Cell",
                        "exits": {"east": "room_1_0"}
                    },
                    "room_1_0": {
                        "id": "room_1_0",
                        "template_id": "hall",
                        "name": "Hall",
                        "exits": {"west": {"destination": "room_0_0", "door_level": 2}}
                    }
                }
            }"#,
        );
        let map = load_map_from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        let east = map.room("room_0_0").unwrap().exit(Direction::East).unwrap();
        assert_eq!(east.destination, "room_1_0");
        assert_eq!(east.door_level, 0);
        let west = map.room("room_1_0").unwrap().exit(Direction::West).unwrap();
        assert_eq!(west.door_level, 2);
        assert!(crate::world::validate_map(&map).is_empty());
    }

    #[test]
    fn normalizes_paragraphs() {
        assert_eq!(normalize_multiline_desc("  a\n  b\n\n\n  c  "), "a b\n\nc");
        assert_eq!(normalize_multiline_desc("\n\n"), "");
    }
}
