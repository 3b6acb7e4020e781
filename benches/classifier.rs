use std::hint::black_box;

use balatro_watch::cards::{parse_cards, Card, Rank, Suit};
use balatro_watch::classifier::classify;
use balatro_watch::snapshot::GameSnapshot;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_hands(n: usize, size: usize) -> Vec<Vec<Card>> {
    let mut rng = ChaCha8Rng::seed_from_u64(0xBA1A);
    (0..n)
        .map(|_| {
            (0..size)
                .map(|_| {
                    let rank = Rank::ALL[rng.random_range(0..Rank::ALL.len())];
                    let suit = Suit::ALL[rng.random_range(0..Suit::ALL.len())];
                    Card::new(rank, suit)
                })
                .collect()
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let full_house = parse_cards("2S 2H 2D 5C 5S 9H KD QC").unwrap_or_default();
    let mut g = c.benchmark_group("classify");
    g.bench_with_input(BenchmarkId::new("fixed", "full_house_8"), &full_house, |b, hand| {
        b.iter(|| classify(black_box(hand)))
    });
    for size in [5usize, 8, 16] {
        let hands = random_hands(256, size);
        g.bench_with_input(BenchmarkId::new("random", size), &hands, |b, hands| {
            b.iter(|| {
                for hand in hands {
                    black_box(classify(black_box(hand)));
                }
            })
        });
    }
    g.finish();
}

fn bench_parse_snapshot(c: &mut Criterion) {
    let cards: Vec<String> = random_hands(1, 8)[0]
        .iter()
        .map(|card| {
            let rank = card.rank().map_or("?", Rank::name);
            let suit = card.suit().map_or("?", Suit::name);
            format!(r#"{{"rank":"{rank}","suit":"{suit}","enhancement":"none"}}"#)
        })
        .collect();
    let text = format!(
        r#"{{"player_data":{{"cash":10,"hands_left":4,"discards_left":3}},"current_hand":[{}]}}"#,
        cards.join(",")
    );
    c.bench_function("snapshot_from_json", |b| {
        b.iter(|| GameSnapshot::from_json(black_box(&text)))
    });
}

criterion_group!(benches, bench_classify, bench_parse_snapshot);
criterion_main!(benches);
