use std::sync::Arc;
use std::time::Duration;

use bson::doc;
use dex_core::*;
use dex_store::{MemoryStore, Provision};

const COLLECTION: &str = "kanto_pokemons";

fn service() -> PokedexService {
    let store = MemoryStore::new();
    store
        .insert_many(
            COLLECTION,
            vec![
                doc! { "dex_number": "#007", "name": "Squirtle", "type_01": "Water", "type_02": "", "is_legendary": "False" },
                doc! { "dex_number": "#025", "name": "Pikachu", "type_01": "Electric", "type_02": "", "is_legendary": "False" },
                doc! { "dex_number": "#135", "name": "Jolteon", "type_01": "Electric", "type_02": "", "is_legendary": "False" },
                doc! { "dex_number": "#145", "name": "Zapdos", "type_01": "Electric", "type_02": "Flying", "is_legendary": "True" }
            ],
        )
        .unwrap();
    PokedexService::new(Arc::new(store), COLLECTION)
}

#[test]
fn get_by_id_pads_the_number() {
    let service = service();
    assert_eq!(service.get_by_id("7", Deadline::NONE).unwrap().name, "Squirtle");
    assert_eq!(service.get_by_id("025", Deadline::NONE).unwrap().name, "Pikachu");
}

#[test]
fn get_by_id_rejects_bad_ids() {
    let service = service();
    for id in ["-1", "1000", "pikachu", ""] {
        assert!(
            matches!(service.get_by_id(id, Deadline::NONE), Err(DexError::InvalidArgument(_))),
            "{id:?} should be rejected"
        );
    }
}

#[test]
fn get_by_id_unknown_is_not_found() {
    let service = service();
    assert!(matches!(
        service.get_by_id("151", Deadline::NONE),
        Err(DexError::NotFound(_))
    ));
}

#[test]
fn get_by_name_ignores_case() {
    let service = service();
    assert_eq!(service.get_by_name("ZAPDOS", Deadline::NONE).unwrap().dex_number, "#145");
    assert!(matches!(
        service.get_by_name("Zap", Deadline::NONE),
        Err(DexError::NotFound(_))
    ));
}

#[test]
fn search_types_and_legendary() {
    let service = service();
    let criteria = Criteria::new(None, Some("electric".into()), Some("false".into()));
    let found = service.search(&criteria, Deadline::NONE).unwrap();
    let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Pikachu", "Jolteon"]);

    assert_eq!(
        service.types(Deadline::NONE).unwrap(),
        ["Water", "Electric", "Flying"]
    );

    let legendary = service.legendary(Deadline::NONE).unwrap();
    assert_eq!(legendary.len(), 1);
    assert_eq!(legendary[0].name, "Zapdos");
}

#[test]
fn list_all_and_stats() {
    let service = service();
    assert_eq!(service.list_all(Deadline::NONE).unwrap().len(), 4);

    let stats = service.stats(Deadline::NONE).unwrap();
    assert_eq!(stats.total_pokemon, 4);
    assert_eq!(stats.legendary_count, 1);
    assert_eq!(stats.type_distribution["Electric"], 3);
    assert_eq!(stats.type_distribution["Water"], 1);
    assert!(!stats.type_distribution.contains_key("Flying"));
}

#[test]
fn expired_deadline_surfaces_as_store_timeout() {
    let service = service();
    let err = service.stats(Deadline::after(Duration::ZERO)).unwrap_err();
    assert!(matches!(err, DexError::Store(StoreError::Timeout)));
}
