use svmap_core::io::load_reference;
use svmap_core::{Aligner, BatchSummary, Distance, ReadGenerator, SimulateParams, Sv};
use std::io::Write;
use tempfile::Builder;

/// 40 distinct distances in [1000, 1900); no single distance equals the sum
/// of two, so every exact match is the intended one.
fn reference() -> Vec<Distance> {
    (0..40u64).map(|i| 1000 + (i * 37 % 97) * 9).collect()
}

const START: usize = 3;
const LEN: usize = 16;

fn base_read(reference: &[Distance]) -> Vec<Distance> {
    reference[START..START + LEN].to_vec()
}

#[test]
fn concrete_self_alignment() {
    let reference = [10, 20, 30, 40, 50];
    let outcome = Aligner::default().align(&reference, &reference);

    assert_eq!(outcome.start_guess, 0);
    assert!(outcome.svs.is_empty());
}

#[test]
fn concrete_merged_pair() {
    let outcome = Aligner::default().align(&[10, 20, 30, 40, 50], &[10, 50, 40, 50]);

    assert_eq!(outcome.start_guess, 0);
    assert_eq!(outcome.svs, vec![Sv::missing_site(1, 50, 20)]);
    assert_eq!(outcome.track, vec!["10", "20s", "30s", "40", "50"]);
}

#[test]
fn every_sub_sequence_is_located() {
    let reference = reference();
    let aligner = Aligner::default();

    for k in 0..reference.len() {
        for n in 2..=reference.len() - k {
            let outcome = aligner.align(&reference, &reference[k..k + n]);
            assert_eq!(outcome.start_guess, k, "slice {}..{}", k, k + n);
            assert!(outcome.svs.is_empty(), "slice {}..{}: {:?}", k, k + n, outcome.svs);
        }
    }
}

#[test]
fn missing_site_round_trip() {
    let reference = reference();
    let base = base_read(&reference);
    let aligner = Aligner::default();

    for p in 0..LEN - 1 {
        let (a, b) = (base[p], base[p + 1]);
        let mut read = base[..p].to_vec();
        read.push(a + b);
        read.extend_from_slice(&base[p + 2..]);

        let outcome = aligner.align(&reference, &read);
        assert_eq!(outcome.start_guess, START, "merge at {}", p);
        assert_eq!(outcome.svs, vec![Sv::missing_site(p, a + b, a)], "merge at {}", p);
    }
}

#[test]
fn extra_site_round_trip() {
    let reference = reference();
    let base = base_read(&reference);
    let aligner = Aligner::default();

    for p in 0..LEN {
        let c = base[p];
        for s in [1, c / 3, c / 2, c - 1, c] {
            let mut read = base[..p].to_vec();
            read.extend_from_slice(&[s, c - s]);
            read.extend_from_slice(&base[p + 1..]);

            let outcome = aligner.align(&reference, &read);
            assert_eq!(outcome.start_guess, START, "split {} at {}", s, p);
            assert_eq!(outcome.svs, vec![Sv::extra_site(p, c, s)], "split {} at {}", s, p);
        }
    }
}

#[test]
fn inversion_round_trip() {
    let reference = reference();
    let base = base_read(&reference);
    let aligner = Aligner::default();

    for p in 0..LEN - 1 {
        let mut read = base.clone();
        read.swap(p, p + 1);

        let outcome = aligner.align(&reference, &read);
        assert_eq!(outcome.start_guess, START, "swap at {}", p);
        assert_eq!(outcome.svs, vec![Sv::inversion(p, 2)], "swap at {}", p);
    }
}

#[test]
fn long_delete_round_trip() {
    let reference = reference();
    let aligner = Aligner::default();
    let k = 2;

    // The gap has to outlast the decay of the score built up before it
    for p in 2..=8 {
        for len in p + 3..=p + 6 {
            let mut read = reference[k..k + p].to_vec();
            read.extend_from_slice(&reference[k + p + len..k + p + len + 5]);

            let outcome = aligner.align(&reference, &read);
            assert_eq!(outcome.start_guess, k, "delete {} after {}", len, p);
            assert_eq!(outcome.svs, vec![Sv::long_delete(p, len)], "delete {} after {}", len, p);
        }
    }
}

#[test]
fn simulated_site_variants_are_recovered() {
    let reference: Vec<Distance> = (0..200u64).map(|i| 1000 + (i * 37 % 200) * 4).collect();
    let params = SimulateParams {
        max_long_deletes: 0,
        seed: Some(2024),
        ..Default::default()
    };
    let mut generator = ReadGenerator::new(params).unwrap();
    let mut reads = generator.generate_many(&reference, 40).unwrap();

    Aligner::default().locate_all(&reference, &mut reads);
    let summary = BatchSummary::from_reads(&reads);

    assert_eq!(summary.reads, 40);
    assert_eq!(summary.starts_correct, 40);
    assert_eq!(summary.matched_svs, summary.true_svs);
    assert_eq!(summary.spurious_svs, 0);
}

#[test]
fn cmap_reference_end_to_end() {
    let reference = reference();
    let mut file = Builder::new().suffix(".cmap").tempfile().unwrap();
    writeln!(file, "#h CMapId\tContigLength\tNumSites\tSiteID\tLabelChannel\tPosition\tStdDev\tCoverage\tOccurrence").unwrap();

    let total: u64 = reference.iter().sum();
    let mut position = 0;
    for (idx, d) in reference.iter().enumerate() {
        position += d;
        writeln!(file, "5\t{}.0\t{}\t{}\t1\t{}.0\t0.0\t1\t1", total, reference.len(), idx + 1, position).unwrap();
    }
    writeln!(file, "6\t100.0\t1\t1\t1\t50.0\t0.0\t1\t1").unwrap();

    let loaded = load_reference(file.path(), 5).unwrap();
    assert_eq!(loaded.distances, reference);

    let outcome = Aligner::default().align(&loaded.distances, &reference[10..20]);
    assert_eq!(outcome.start_guess, 10);
}
