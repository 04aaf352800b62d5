//! roomcalc_engine - Room dimension sheet with derived area/volume.

pub mod engine;
pub mod error;

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    /// Half-up rounding of `num / den` for non-negative integers.
    fn div_half_up(num: i64, den: i64) -> i64 {
        (num + den / 2) / den
    }

    proptest! {
        #[test]
        fn prop_derived_columns_match_integer_oracle(
            w in 0i64..100_000,
            l in 0i64..100_000,
            h in 0i64..10_000,
        ) {
            let mut sheet = Sheet::new(CalcConfig::default(), 1);
            sheet.edit(0, 1, &format_fixed(Decimal::new(w, 2), 2)).unwrap();
            sheet.edit(0, 2, &format_fixed(Decimal::new(l, 2), 2)).unwrap();
            sheet.edit(0, 3, &format_fixed(Decimal::new(h, 2), 2)).unwrap();

            // w, l, h are in hundredths; w*l is in ten-thousandths.
            let area_tenths = div_half_up(w * l, 1000);
            // h*area is in thousandths.
            let volume = div_half_up(h * area_tenths, 1000);

            let row = sheet.grid().row(0).unwrap();
            prop_assert_eq!(row.decimal(Column::Area), Decimal::new(area_tenths, 1));
            prop_assert_eq!(row.decimal(Column::Volume), Decimal::new(volume, 0));
            prop_assert_eq!(sheet.summary().total_area, Decimal::new(area_tenths, 1));
        }

        #[test]
        fn prop_recompute_is_idempotent(
            dims in prop::collection::vec((0i64..5_000, 0i64..5_000, 0i64..500), 1..6),
            markers in prop::collection::vec(prop::sample::select(vec!["A", "B", "+", "-", "C!"]), 1..6),
        ) {
            let mut sheet = Sheet::new(CalcConfig::default(), 0);
            let rows: Vec<Vec<String>> = dims
                .iter()
                .zip(markers.iter().cycle())
                .map(|(&(w, l, h), label)| {
                    vec![
                        label.to_string(),
                        Decimal::new(w, 2).to_string(),
                        Decimal::new(l, 2).to_string(),
                        Decimal::new(h, 2).to_string(),
                    ]
                })
                .collect();
            let first = sheet.load_matrix(&rows).unwrap();
            let dumped = sheet.to_matrix(MatrixShape::Full);

            let second = sheet.recompute().unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(sheet.to_matrix(MatrixShape::Full), dumped);
        }
    }
}
