use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use life_rollup::{life::check_transition, life::next_state, Board, Rollup, BOARD_SIZE};

fn random_board(rng: &mut StdRng) -> Board {
    let mut cells = [[0u32; BOARD_SIZE]; BOARD_SIZE];
    for row in cells.iter_mut() {
        for cell in row.iter_mut() {
            *cell = rng.gen_range(0..2);
        }
    }
    Board::from_cells(cells)
}

fn bench_rule(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let boards: Vec<Board> = (0..64).map(|_| random_board(&mut rng)).collect();

    c.bench_function("next_state", |b| {
        b.iter(|| {
            for board in &boards {
                black_box(next_state(board));
            }
        })
    });

    let pairs: Vec<(Board, Board)> = boards.iter().map(|b| (*b, next_state(b))).collect();
    c.bench_function("check_transition", |b| {
        b.iter(|| {
            for (from, to) in &pairs {
                black_box(check_transition(from, to)).ok();
            }
        })
    });
}

fn bench_chain(c: &mut Criterion) {
    let rollup = Rollup::compile(b"bench");
    let mut rng = StdRng::seed_from_u64(11);
    let board = random_board(&mut rng);

    let mut group = c.benchmark_group("prove_chain");
    for steps in [2u32, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            b.iter(|| rollup.prove_chain(black_box(&board), steps))
        });
    }
    group.finish();

    let proof = match rollup.prove_chain(&board, 64) {
        Ok(proof) => proof,
        Err(e) => panic!("bench chain failed: {}", e),
    };
    c.bench_function("verify", |b| b.iter(|| rollup.verify(black_box(&proof))));
}

criterion_group!(benches, bench_rule, bench_chain);
criterion_main!(benches);
