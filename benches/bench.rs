// Criterion benchmarks for SkillSwap Match

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use skillswap_match::core::{Matcher, score};
use skillswap_match::models::SkillProfile;

const SKILLS: &[&str] = &[
    "Rust", "Go", "Python", "JavaScript", "SQL", "Design", "Photography",
    "Spanish", "Guitar", "Cooking", "Statistics", "Public Speaking",
];

fn create_candidate(id: usize) -> SkillProfile {
    let teach = (0..1 + id % 4)
        .map(|k| SKILLS[(id + k * 5) % SKILLS.len()].to_string())
        .collect();
    let learn = (0..1 + id % 3)
        .map(|k| SKILLS[(id * 7 + k * 3) % SKILLS.len()].to_string())
        .collect();

    SkillProfile {
        id: id.to_string(),
        name: format!("User {}", id),
        bio: if id % 2 == 0 { Some("Happy to swap lessons on weekends".to_string()) } else { None },
        avatar: None,
        skills_to_teach: teach,
        skills_to_learn: learn,
    }
}

fn create_subject() -> SkillProfile {
    SkillProfile {
        id: "current_user".to_string(),
        name: "Current User".to_string(),
        bio: None,
        avatar: None,
        skills_to_teach: vec!["Rust".to_string(), "Guitar".to_string(), "SQL".to_string()],
        skills_to_learn: vec!["Python".to_string(), "Spanish".to_string(), "Design".to_string()],
    }
}

fn bench_score(c: &mut Criterion) {
    let subject = create_subject();
    let candidate = create_candidate(11);

    c.bench_function("score_pair", |b| {
        b.iter(|| score(black_box(&subject), black_box(&candidate)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let subject = create_subject();

    let mut group = c.benchmark_group("matching");

    for population_size in [10, 100, 1000, 5000].iter() {
        let population: Vec<SkillProfile> = (0..*population_size).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("find_matches", population_size),
            population_size,
            |b, _| {
                b.iter(|| {
                    matcher.find_matches(
                        black_box(&subject),
                        black_box(&population),
                        black_box(20),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_score, bench_matching);

criterion_main!(benches);
