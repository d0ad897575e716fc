//! Tests for candidate identity and merging

use super::*;
use tcg_common::{PriceBlock, Source};

fn card(source: Source, name: &str, set_name: &str, number: &str) -> CardCandidate {
    let mut candidate = CardCandidate {
        name: name.to_string(),
        set_name: set_name.to_string(),
        number: number.to_string(),
        ..Default::default()
    };
    candidate.sources.insert(source);
    candidate
}

fn price(currency: &str, market: f64) -> PriceBlock {
    PriceBlock {
        currency: currency.to_string(),
        market: Some(market),
        ..Default::default()
    }
}

// ── DedupKey ─────────────────────────────────────────────────────────

#[test]
fn key_ignores_case_punctuation_and_spacing() {
    let a = card(Source::PokemonTcg, "Farfetch'd", "Base  Set", "27");
    let b = card(Source::Tcgdex, "FARFETCHD", "base set", "27");
    assert_eq!(DedupKey::of(&a), DedupKey::of(&b));
    assert_eq!(DedupKey::of(&a).as_str(), "farfetchd::27::base set");
}

#[test]
fn key_strips_series_phrases_from_set_only() {
    let a = card(Source::PokemonTcg, "Charizard", "Pokemon Base Set", "4");
    let b = card(Source::Tcgdex, "Charizard", "Base Set", "4");
    assert_eq!(DedupKey::of(&a), DedupKey::of(&b));

    let named = card(Source::Tcgdex, "Pokemon Center Lady", "Flashfire", "93");
    assert!(DedupKey::of(&named).as_str().starts_with("pokemon center lady::"));
}

#[test]
fn key_normalizes_collector_numbers() {
    assert_eq!(normalize_number("004/102"), "4");
    assert_eq!(normalize_number("4"), "4");
    assert_eq!(normalize_number("000"), "0");
    assert_eq!(normalize_number("SWSH050"), "swsh050");
    assert_eq!(normalize_number(""), "");
}

#[test]
fn set_made_only_of_series_words_is_kept() {
    assert_eq!(normalize_set_name("Pokémon TCG"), "pokémon tcg");
    assert_eq!(normalize_set_name("Pokemon TCG: Sword & Shield"), "sword shield");
}

#[test]
fn different_numbers_are_different_cards() {
    let a = card(Source::PokemonTcg, "Pikachu", "Base Set", "58");
    let b = card(Source::PokemonTcg, "Pikachu", "Base Set", "60");
    assert_ne!(DedupKey::of(&a), DedupKey::of(&b));
}

// ── merge_candidates ─────────────────────────────────────────────────

#[test]
fn merge_fills_image_and_price_from_both_sides() {
    let mut a = card(Source::PokemonTcg, "Charizard", "Pokemon Base Set", "4");
    a.image_url = Some("https://img.example.com/charizard.png".to_string());
    let mut b = card(Source::Tcgdex, "Charizard", "Base Set", "4");
    b.prices.tcgdex = Some(price("EUR", 335.2));

    let merged = merge_candidates(a, b);
    assert!(merged.has_image());
    assert!(merged.has_price());
    assert_eq!(merged.set_name, "Pokemon Base Set");
    assert_eq!(
        merged.sources.iter().copied().collect::<Vec<_>>(),
        vec![Source::PokemonTcg, Source::Tcgdex]
    );
}

#[test]
fn merge_seed_wins_non_empty_fields() {
    let mut a = card(Source::Tcgdex, "Mew", "", "8");
    a.rarity = "Rare".to_string();
    a.external_ids.insert(Source::Tcgdex, "dex-8".to_string());
    let mut b = card(Source::PokemonTcg, "Mew", "Wizards Promo", "8");
    b.rarity = "Promo".to_string();
    b.external_ids.insert(Source::Tcgdex, "other".to_string());
    b.external_ids.insert(Source::PokemonTcg, "basep-8".to_string());

    let merged = merge_candidates(a, b);
    assert_eq!(merged.rarity, "Rare");
    assert_eq!(merged.set_name, "Wizards Promo");
    assert_eq!(merged.external_id(Source::Tcgdex), Some("dex-8"));
    assert_eq!(merged.external_id(Source::PokemonTcg), Some("basep-8"));
}

#[test]
fn merge_keeps_price_blocks_per_catalog() {
    let mut a = card(Source::PokemonTcg, "Mew", "Promo", "8");
    a.prices.pokemon_tcg = Some(price("USD", 12.0));
    a.prices.tcgdex = Some(PriceBlock {
        currency: "EUR".to_string(),
        ..Default::default()
    });
    let mut b = card(Source::Tcgdex, "Mew", "Promo", "8");
    b.prices.pokemon_tcg = Some(price("USD", 99.0));
    b.prices.tcgdex = Some(price("EUR", 10.5));

    let merged = merge_candidates(a, b);
    assert_eq!(merged.prices.pokemon_tcg.unwrap().market, Some(12.0));
    assert_eq!(merged.prices.tcgdex.unwrap().market, Some(10.5));
}

// ── dedup ────────────────────────────────────────────────────────────

#[test]
fn dedup_collapses_duplicates_in_first_seen_order() {
    let mut b_dup = card(Source::Tcgdex, "Charizard", "Base Set", "4");
    b_dup.image_url = Some("https://img.example.com/c.png".to_string());

    let out = dedup(vec![
        card(Source::PokemonTcg, "Charizard", "Pokemon Base Set", "4"),
        card(Source::PokemonTcg, "Blastoise", "Base Set", "2"),
        b_dup,
    ]);

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].name, "Charizard");
    assert!(out[0].has_image());
    assert_eq!(out[0].sources.len(), 2);
    assert_eq!(out[1].name, "Blastoise");
}

#[test]
fn dedup_is_idempotent() {
    let once = dedup(vec![
        card(Source::PokemonTcg, "Pikachu", "Jungle", "60"),
        card(Source::Tcgdex, "pikachu", "jungle", "060"),
        card(Source::Tcgdex, "Pikachu", "Base Set", "58"),
    ]);
    let twice = dedup(once.clone());
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
}
