//! Tests for rule-frequency estimation over SMILES records

#[cfg(test)]
mod tests {
    use rxnstats::StatsError;
    use rxnstats::io::progress::ScanProgress;
    use rxnstats::source::calculator::{BondKey, SmilesStatsCalculator};
    use rxnstats::source::dataset::StatsCalculator;
    use rxnstats::source::smiles::{BondOrder, parse_smiles};

    fn records(lines: &[&str]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    // Tests tallies, shares and size statistics over a small dataset
    // Verified by counting ring bonds into the general table only
    #[test]
    fn test_calculate_counts() {
        let calculator = SmilesStatsCalculator::new();
        let raw = calculator
            .calculate(&records(&["C1=CCCCC1", "CCO", "C$C"]))
            .unwrap();

        assert!((raw.average_size - 4.5).abs() < 1e-12);
        assert!((raw.size_std_dev - 1.5).abs() < 1e-12);

        assert_eq!(raw.general_rules.len(), 3);
        assert_eq!(raw.general_probabilities, vec![0.75, 0.125, 0.125]);
        assert_eq!(
            raw.general_rules.first().map(|rule| rule.as_str()),
            Some("[#6;!H0:1]>>[#6:1]-[#6]")
        );

        assert_eq!(raw.ring_closing_rules.len(), 2);
        assert!((raw.ring_closing_probabilities[0] - 5.0 / 6.0).abs() < 1e-12);
        assert!((raw.ring_closing_probabilities[1] - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(
            raw.ring_closing_rules[1].as_str(),
            "[#6;!R;!H0;!H1:1].[#6;!R;!H0;!H1:2]>>[#6:1]=[#6:2]"
        );
        assert_eq!(raw.ring_forming_rules.len(), 2);
    }

    // Tests derived statistics satisfy raw validation
    // Verified by emitting raw counts instead of shares
    #[test]
    fn test_calculate_produces_distributions() {
        let calculator = SmilesStatsCalculator::with_progress(ScanProgress::hidden());
        let raw = calculator
            .calculate(&records(&["c1ccncc1C(=O)O", "C1CC=CC1", "OCC#N", "C1CCOC1"]))
            .unwrap();

        assert!(raw.validate(1e-9).is_ok());
        assert!(
            raw.ring_closing_rules
                .iter()
                .any(|rule| rule.denotes_double_bond())
        );
    }

    // Tests failure when nothing parses
    // Verified by returning zero size statistics
    #[test]
    fn test_all_records_unparsable() {
        let result = SmilesStatsCalculator::new().calculate(&records(&["C(", "Q"]));

        match result {
            Err(StatsError::StatisticsDerivation { reason }) => {
                assert!(reason.contains("none of 2 records"));
            }
            other => panic!("expected derivation error, got {other:?}"),
        }
    }

    // Tests acyclic and bond-free datasets cannot populate ring tables
    // Verified by allowing empty ring-closing tables
    #[test]
    fn test_missing_bonds_rejected() {
        let acyclic = SmilesStatsCalculator::new().calculate(&records(&["CCO"]));
        assert!(matches!(
            acyclic,
            Err(StatsError::StatisticsDerivation { ref reason }) if reason.contains("ring bonds")
        ));

        let atoms_only = SmilesStatsCalculator::new().calculate(&records(&["C", "[H][H]"]));
        assert!(matches!(
            atoms_only,
            Err(StatsError::StatisticsDerivation { ref reason }) if reason.contains("no bonds")
        ));
    }

    // Tests bond keys ignore direction and skip hydrogens
    // Verified by keeping atom order in keys
    #[test]
    fn test_bond_key() {
        assert_eq!(
            BondKey::new(8, 6, BondOrder::Double),
            BondKey::new(6, 8, BondOrder::Double)
        );

        let graph = parse_smiles("[H]OC").unwrap();
        let keys: Vec<Option<BondKey>> = graph
            .bonds()
            .iter()
            .map(|bond| BondKey::of(&graph, bond))
            .collect();
        assert_eq!(keys, vec![None, Some(BondKey::new(6, 8, BondOrder::Single))]);
    }

    // Tests rule encodings per bond order
    // Verified by using single-bond hydrogen query for triple bonds
    #[test]
    fn test_rule_encodings() {
        let triple = BondKey::new(6, 7, BondOrder::Triple);
        assert_eq!(
            triple.general_rule().as_str(),
            "[#6;!H0;!H1;!H2:1]>>[#6:1]#[#7]"
        );

        let aromatic = BondKey::new(6, 6, BondOrder::Aromatic);
        assert_eq!(
            aromatic.ring_forming_rule().as_str(),
            "[#6;!R;!H0:1]~[#6;!R;!H0:2]>>[#6:1]1~[#6:2]:[#6]1"
        );
        assert!(!aromatic.ring_closing_rule().denotes_double_bond());
        assert!(
            BondKey::new(6, 8, BondOrder::Double)
                .ring_closing_rule()
                .denotes_double_bond()
        );
    }
}
