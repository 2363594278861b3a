// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Flagship Affordability Engine - Reference Scenarios

use flagship_engine::{MissionId, Parameters};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub params: Parameters,
    /// Checked only against the shipped table and default configuration.
    pub expect: Expectation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expectation {
    Launch { years: [i32; 3], overlap: u32 },
    Overflow(MissionId),
}

fn params(rate: Decimal, costs: [Decimal; 3], lifetime: Decimal) -> Parameters {
    Parameters { envelope_rate: rate, mission_costs: costs, lifetime_years: lifetime }
}

// ─── Scenario Catalogue ─────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    let baseline_costs = [dec!(10.0), dec!(6.0), dec!(5.0)];
    vec![
        Scenario {
            name: "DEFAULTS",
            label: "Default controls",
            params: Parameters::default(),
            expect: Expectation::Launch { years: [2044, 2054, 2062], overlap: 0 },
        },
        Scenario {
            name: "LONG_LIFETIME",
            label: "Default wedge, 25-year missions",
            params: params(dec!(0.6), baseline_costs, dec!(25)),
            expect: Expectation::Launch { years: [2044, 2054, 2062], overlap: 7 },
        },
        Scenario {
            name: "LEAN_WEDGE",
            label: "Minimum wedge",
            params: params(dec!(0.5), baseline_costs, dec!(10)),
            expect: Expectation::Launch { years: [2047, 2059, 2069], overlap: 0 },
        },
        Scenario {
            name: "WIDE_WEDGE",
            label: "1.0 $B/yr wedge",
            params: params(dec!(1.0), baseline_costs, dec!(10)),
            expect: Expectation::Launch { years: [2037, 2043, 2048], overlap: 0 },
        },
        Scenario {
            name: "RAPID_CADENCE",
            label: "1.5 $B/yr wedge, 20-year missions",
            params: params(dec!(1.5), baseline_costs, dec!(20)),
            expect: Expectation::Launch { years: [2033, 2036, 2039], overlap: 14 },
        },
        Scenario {
            name: "CHEAP_TRIO",
            label: "Three 3 $B missions",
            params: params(dec!(0.6), [dec!(3.0); 3], dec!(10)),
            expect: Expectation::Launch { years: [2032, 2037, 2042], overlap: 0 },
        },
        Scenario {
            name: "MAX_ENVELOPE",
            label: "2 $B/yr wedge, three 20 $B missions",
            params: params(dec!(2.0), [dec!(20.0); 3], dec!(30)),
            expect: Expectation::Launch { years: [2037, 2047, 2057], overlap: 10 },
        },
        Scenario {
            name: "LEAN_OVERRUN",
            label: "Minimum wedge, three 20 $B missions",
            params: params(dec!(0.5), [dec!(20.0); 3], dec!(10)),
            expect: Expectation::Overflow(MissionId::M2),
        },
    ]
}
