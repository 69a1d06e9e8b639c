//! Lineup correlation matrix.

use nalgebra::DMatrix;

use crate::config::CorrelationConfig;
use crate::domain::{Player, Position};

use super::distribution::ProjectionDistribution;

/// Builds the pairwise correlation matrix for a set of players.
///
/// Precedence per pair, first match wins:
/// 1. shared explicit correlation group
/// 2. QB with a same-team WR/TE
/// 3. RB with the opposing DST
/// 4. same game
/// 5. otherwise uncorrelated
#[derive(Debug, Clone)]
pub struct CorrelationMatrixBuilder {
    coefficients: CorrelationConfig,
}

impl CorrelationMatrixBuilder {
    /// Builder with the given coefficients.
    pub const fn new(coefficients: CorrelationConfig) -> Self {
        Self { coefficients }
    }

    /// Symmetric matrix with unit diagonal.
    pub fn build(&self, players: &[ProjectionDistribution]) -> DMatrix<f64> {
        let n = players.len();
        let mut matrix = DMatrix::identity(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                let rho = self.pair(&players[i], &players[j]);
                matrix[(i, j)] = rho;
                matrix[(j, i)] = rho;
            }
        }
        matrix
    }

    /// Correlation coefficient for one pair.
    pub fn pair(&self, a: &ProjectionDistribution, b: &ProjectionDistribution) -> f64 {
        if let (Some(ga), Some(gb)) = (a.correlation_group(), b.correlation_group()) {
            if ga == gb {
                return self.coefficients.shared_group;
            }
        }

        let (pa, pb): (&Player, &Player) = (a.player(), b.player());

        let qb_stack = |qb: &Player, other: &Player| {
            qb.position() == Position::Qb
                && other.position().is_pass_catcher()
                && qb.team() == other.team()
        };
        if qb_stack(pa, pb) || qb_stack(pb, pa) {
            return self.coefficients.qb_receiver;
        }

        let rb_vs_dst = |rb: &Player, dst: &Player| {
            rb.position() == Position::Rb
                && dst.position() == Position::Dst
                && (rb.opponent() == dst.team() || rb.team() == dst.opponent())
        };
        if rb_vs_dst(pa, pb) || rb_vs_dst(pb, pa) {
            return self.coefficients.rb_opposing_dst;
        }

        if pa.shares_game_with(pb) {
            return self.coefficients.same_game;
        }

        0.0
    }
}

/// True when `matrix` has no off-diagonal correlation.
pub fn is_identity(matrix: &DMatrix<f64>) -> bool {
    matrix
        .iter()
        .enumerate()
        .all(|(k, &v)| {
            let (i, j) = (k % matrix.nrows(), k / matrix.nrows());
            if i == j { v == 1.0 } else { v == 0.0 }
        })
}
