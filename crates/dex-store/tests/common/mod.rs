#![allow(dead_code)]

use bson::{Document, doc};
use dex_store::{MemoryStore, Provision};

pub const COLLECTION: &str = "kanto_pokemons";

fn pokemon(dex: &str, name: &str, type_01: &str, type_02: &str, legendary: &str) -> Document {
    doc! {
        "dex_number": dex,
        "name": name,
        "type_01": type_01,
        "type_02": type_02,
        "ability_01": "",
        "ability_02": "",
        "hidden_ability": "",
        "egg_group_01": "Monster",
        "is_legendary": legendary,
        "bio": "",
        "hp": "50",
        "attack": "50",
        "defense": "50",
        "sp_attack": "50",
        "sp_defense": "50",
        "speed": "50"
    }
}

/// Six records over Grass, Fire and Psychic primaries. Two are legendary.
pub fn seed_docs() -> Vec<Document> {
    vec![
        pokemon("#001", "Bulbasaur", "Grass", "Poison", "False"),
        pokemon("#004", "Charmander", "Fire", "", "False"),
        pokemon("#006", "Charizard", "Fire", "Flying", "False"),
        pokemon("#122", "Mr. Mime", "Psychic", "Fairy", "False"),
        pokemon("#146", "Moltres", "Fire", "Flying", "True"),
        pokemon("#150", "Mewtwo", "Psychic", "", "True"),
    ]
}

pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_many(COLLECTION, seed_docs()).unwrap();
    store
}
