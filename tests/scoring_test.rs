//! Integration tests for wallet risk scoring

use risk_oracle::{
    CounterpartyMode, ErrorCode, RiskResult, RiskScorer, ScoringConfig, TransactionRecord,
};

const WEI: u128 = 1_000_000_000_000_000_000;

fn scorer() -> RiskScorer {
    RiskScorer::new(ScoringConfig::with_threshold(7))
}

fn transfer(i: usize, from: &str, to: &str) -> TransactionRecord {
    TransactionRecord::new(format!("0x{:04x}", i))
        .from_addr(from)
        .to_addr(to)
}

#[test]
fn test_wallet_without_history() {
    let result = scorer().score("0xabc", &[]).unwrap();
    assert_eq!(
        result,
        RiskResult {
            wallet: "0xabc".to_string(),
            risk_score: 1,
            compliant: true,
            reasons: vec![],
            sample_tx_count: 0,
        }
    );
}

#[test]
fn test_high_volume_of_zero_value_transfers() {
    let txs: Vec<_> = (0..25).map(|i| transfer(i, "0xabc", "0xdef")).collect();
    let result = scorer().score("0xabc", &txs).unwrap();

    assert_eq!(result.risk_score, 3);
    assert!(result.compliant);
    assert_eq!(result.reasons, vec!["high number of recent transactions"]);
    assert_eq!(result.sample_tx_count, 25);
}

#[test]
fn test_single_whale_transfer() {
    let txs = vec![transfer(0, "0xabc", "0xdef").with_value(2_000_000 * WEI)];
    let result = scorer().score("0xabc", &txs).unwrap();

    assert_eq!(result.risk_score, 6);
    assert!(result.compliant);
    assert_eq!(
        result.reasons,
        vec!["very large single transaction", "high average transaction value"]
    );
}

#[test]
fn test_large_single_transfer() {
    // maxTx 200k +2; avg 200k silent +1
    let txs = vec![transfer(0, "0xabc", "0xdef").with_value(200_000 * WEI)];
    let assessment = scorer().assess("0xabc", &txs).unwrap();

    assert_eq!(assessment.result.risk_score, 4);
    assert_eq!(assessment.result.reasons, vec!["large single transaction"]);
    assert_eq!(assessment.breakdown[1].category, "average_size");
    assert_eq!(assessment.breakdown[1].reason, None);
}

#[test]
fn test_self_transfers_have_no_counterparty() {
    let txs = vec![
        transfer(0, "0xabc", "0xabc"),
        transfer(1, "0xABC", "0xabc"),
        transfer(2, "0xabc", "0x111"),
    ];
    let assessment = scorer().assess("0xabc", &txs).unwrap();
    assert_eq!(assessment.stats.unique_counterparties, 1);

    let only_self = scorer().assess("0xabc", &txs[..2]).unwrap();
    assert_eq!(only_self.stats.unique_counterparties, 0);
    assert_eq!(only_self.result.risk_score, 1);
}

#[test]
fn test_blank_wallet_rejected() {
    for wallet in ["", "   ", "\t\n"] {
        let err = scorer().score(wallet, &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::WalletInvalidAddress, "wallet {:?}", wallet);
    }
}

#[test]
fn test_wallet_is_trimmed() {
    let result = scorer().score("  0xAbC \n", &[]).unwrap();
    assert_eq!(result.wallet, "0xAbC");
}

#[test]
fn test_many_counterparties() {
    let txs: Vec<_> = (0..10)
        .map(|i| transfer(i, "0xabc", &format!("0x{}", i)))
        .collect();
    let result = scorer().score("0xabc", &txs).unwrap();

    // volume +1 (10 tx), spread +2
    assert_eq!(result.risk_score, 4);
    assert_eq!(result.reasons, vec!["many unique counterparties"]);
}

#[test]
fn test_counterparty_case_folding() {
    let txs = vec![
        transfer(0, "0xABC", "0xDEF"),
        transfer(1, "0xdef", "0xabc"),
        transfer(2, "0xabc", "0x111"),
        transfer(3, "0xabc", "0x222"),
        transfer(4, "0xabc", "0x333"),
    ];
    let assessment = scorer().assess("0xabc", &txs).unwrap();
    assert_eq!(assessment.stats.unique_counterparties, 4);
    assert_eq!(assessment.result.risk_score, 2);
    assert!(assessment.result.reasons.is_empty());
}

#[test]
fn test_legacy_counterparty_mode() {
    let config = ScoringConfig {
        counterparty_mode: CounterpartyMode::SubtractOne,
        ..ScoringConfig::default()
    };
    // The wallet never appears: 4 distinct addresses, minus one
    let txs = vec![transfer(0, "0x1", "0x2"), transfer(1, "0x3", "0x4")];

    let legacy = RiskScorer::new(config).assess("0xabc", &txs).unwrap();
    let default = scorer().assess("0xabc", &txs).unwrap();
    assert_eq!(legacy.stats.unique_counterparties, 3);
    assert_eq!(default.stats.unique_counterparties, 4);
    assert_eq!(default.result.risk_score, legacy.result.risk_score + 1);
}

#[test]
fn test_velocity_within_a_day() {
    let txs: Vec<_> = (0..30)
        .map(|i| {
            transfer(i, "0xabc", "0xdef")
                .with_timestamp(format!("2024-03-01 10:{:02}:00 UTC", i))
        })
        .collect();
    let result = scorer().score("0xabc", &txs).unwrap();

    // volume +2, velocity 30/day +2
    assert_eq!(result.risk_score, 5);
    assert_eq!(
        result.reasons,
        vec!["high number of recent transactions", "high transaction velocity"]
    );
}

#[test]
fn test_velocity_needs_three_timestamps() {
    let mut txs: Vec<_> = (0..8).map(|i| transfer(i, "0xabc", "0xdef")).collect();
    txs[0].timestamp = Some("2024-03-01T00:00:00Z".to_string());
    txs[1].timestamp = Some("2024-03-01T00:01:00Z".to_string());
    txs[2].timestamp = Some("not a date".to_string());

    let assessment = scorer().assess("0xabc", &txs).unwrap();
    assert_eq!(assessment.stats.valid_timestamps, 2);
    assert_eq!(assessment.stats.tx_per_day, None);
    assert_eq!(assessment.result.risk_score, 1);
}

#[test]
fn test_velocity_spread_over_weeks() {
    // 12 tx over 12 days: 1 per day, below every velocity tier
    let txs: Vec<_> = (0..12)
        .map(|i| {
            transfer(i, "0xabc", "0xdef").with_timestamp(format!("2024-03-{:02}", i + 1))
        })
        .collect();
    let assessment = scorer().assess("0xabc", &txs).unwrap();
    assert_eq!(assessment.stats.tx_per_day, Some(12.0 / 11.0));
    assert_eq!(assessment.result.risk_score, 2);
}

#[test]
fn test_threshold_boundary() {
    let txs: Vec<_> = (0..25).map(|i| transfer(i, "0xabc", "0xdef")).collect();

    let at = RiskScorer::new(ScoringConfig::with_threshold(3))
        .score("0xabc", &txs)
        .unwrap();
    assert_eq!(at.risk_score, 3);
    assert!(!at.compliant);

    let above = RiskScorer::new(ScoringConfig::with_threshold(4))
        .score("0xabc", &txs)
        .unwrap();
    assert!(above.compliant);
}

#[test]
fn test_score_clamped_to_ten() {
    let txs: Vec<_> = (0..25)
        .map(|i| {
            transfer(i, "0xabc", &format!("0xcp{}", i))
                .with_value(2_000_000 * WEI)
                .with_timestamp(format!("2024-03-01T10:{:02}:00Z", i))
        })
        .collect();
    let result = scorer().score("0xabc", &txs).unwrap();

    assert_eq!(result.risk_score, 10);
    assert!(!result.compliant);
    assert_eq!(
        result.reasons,
        vec![
            "high number of recent transactions",
            "very large single transaction",
            "high average transaction value",
            "many unique counterparties",
            "high transaction velocity",
        ]
    );
}

#[test]
fn test_order_independent_and_idempotent() {
    let mut txs: Vec<_> = (0..15)
        .map(|i| {
            transfer(i, "0xabc", &format!("0x{}", i % 5))
                .with_value((i as u128 + 1) * 20_000 * WEI)
                .with_timestamp(format!("2024-03-01T{:02}:00:00Z", i))
        })
        .collect();

    let s = scorer();
    let forward = s.assess("0xabc", &txs).unwrap();
    assert_eq!(forward, s.assess("0xabc", &txs).unwrap());

    txs.reverse();
    let reversed = s.assess("0xabc", &txs).unwrap();
    assert_eq!(forward.result, reversed.result);
    assert_eq!(forward.breakdown, reversed.breakdown);
}

#[test]
fn test_breakdown_includes_silent_tiers() {
    // maxTx 20k: silent +1; avg 20k: below tiers
    let txs = vec![transfer(0, "0xabc", "0xdef").with_value(20_000 * WEI)];
    let assessment = scorer().assess("0xabc", &txs).unwrap();

    assert_eq!(assessment.result.risk_score, 2);
    assert!(assessment.result.reasons.is_empty());
    assert_eq!(assessment.breakdown.len(), 1);
    assert_eq!(assessment.breakdown[0].category, "single_tx_size");
    assert_eq!(assessment.breakdown[0].delta, 1);
    assert_eq!(assessment.breakdown[0].reason, None);
}
