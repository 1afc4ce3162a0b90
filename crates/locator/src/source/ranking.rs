use bindery_ranked::Rank;

use crate::binding::BindingInfo;

/// Assigns ranks to the bindings of one source.
pub trait RankingFunction: Send + Sync + 'static {
	/// Highest rank [`RankingFunction::rank`] can return.
	fn max_rank(&self) -> Rank;

	fn rank(&self, binding: &dyn BindingInfo) -> Rank;
}

/// Ranks unqualified bindings at the source's primary rank and everything else below every
/// unqualified binding of any source.
///
/// With primaries 10 and 5, the unqualified binding of the rank-5 source still precedes the
/// named bindings of the rank-10 source, and those precede the rank-5 source's named ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultRankingFunction {
	primary: Rank,
}

impl DefaultRankingFunction {
	pub fn new(primary: Rank) -> Self {
		Self { primary }
	}

	pub fn primary(&self) -> Rank {
		self.primary
	}
}

impl RankingFunction for DefaultRankingFunction {
	fn max_rank(&self) -> Rank {
		self.primary
	}

	fn rank(&self, binding: &dyn BindingInfo) -> Rank {
		if binding.qualifier().is_none() {
			self.primary
		} else {
			self.primary.saturating_add(Rank::MIN)
		}
	}
}
