use crate::commands::Out;
use crate::session::Session;
use crate::summary::Summary;
use crate::{Config, Result};
use std::path::Path;

/// Imports `file` and reports its totals, balance and category breakdowns.
///
/// # Errors
/// - Returns an error if the file cannot be read or decoded.
pub async fn summary(config: Config, file: &Path) -> Result<Out<Summary>> {
    let mut session = Session::new(config);
    session.import_file(file).await?.print();
    Ok(session.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_summary_of_sample() {
        let env = TestEnv::new().await;
        let path = env.path("sample.xlsx");
        crate::commands::sample(env.config(), Some(&path))
            .await
            .unwrap();

        let out = summary(env.config(), &path).await.unwrap();
        let s = out.structure().unwrap();
        assert_eq!(s.income_count, 3);
        assert_eq!(s.outcome_count, 4);
        assert_eq!(s.total_income, 9_800_000);
        assert_eq!(s.total_outcome, 3_500_000);
        assert_eq!(s.balance, 6_300_000);
        assert!(out.message().contains("Balance:       Rp 6.300.000"));
    }

    #[tokio::test]
    async fn test_summary_of_header_only_file() {
        let env = TestEnv::new().await;
        let path = env.path("empty.csv");
        std::fs::write(&path, "Tipe,Kategori,Jumlah,Keterangan,Tanggal\n").unwrap();
        let err = summary(env.config(), &path).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::DecodeFailure);
    }
}
