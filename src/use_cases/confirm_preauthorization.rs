use log::{info, warn};

use crate::domain::repository::{OrderRepository, RepositoryError};
use crate::use_cases::dto::{PreauthorizationNotice, PreauthorizationOutcome};
use crate::use_cases::errors::UseCaseError;

/// Status Fondy reports once the hold is in place.
pub const APPROVED_STATUS: &str = "approved";

const MAX_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct ConfirmPreauthorizationUseCase<R: OrderRepository> {
	order_repo: R,
}

impl<R: OrderRepository> ConfirmPreauthorizationUseCase<R> {
	pub fn new(order_repo: R) -> Self {
		Self { order_repo }
	}

	/// Moves the order to `preauthorized` and records the payment reference.
	///
	/// Notices for orders past that point, or carrying a status other than
	/// approved, leave the order untouched.
	pub async fn execute(
		&self,
		notice: PreauthorizationNotice,
	) -> Result<PreauthorizationOutcome, UseCaseError> {
		let mut last_error = None;

		for _ in 0..MAX_ATTEMPTS {
			let order = self.order_repo.get(&notice.order_id).await.ok_or_else(
				|| UseCaseError::OrderNotFound {
					order_id: notice.order_id.clone(),
				},
			)?;

			if let Some(status) = notice.status.as_deref() &&
				status != APPROVED_STATUS
			{
				warn!(
					"Order {} reported as {status}, not preauthorizing",
					order.id
				);
				return Ok(PreauthorizationOutcome::Ignored(order));
			}

			let state = match order.state.preauthorize() {
				Ok(state) => state,
				Err(reason) => {
					info!("Ignoring preauthorization notice: order {} {reason}", order.id);
					return Ok(PreauthorizationOutcome::Ignored(order));
				}
			};

			let mut next = order.with_state(state);
			if notice.payment_reference.is_some() {
				next.payment_reference = notice.payment_reference.clone();
			}

			match self.order_repo.compare_and_swap(next, order.version).await {
				Ok(confirmed) => {
					info!("Order {} preauthorized", confirmed.id);
					return Ok(PreauthorizationOutcome::Confirmed(confirmed));
				}
				Err(err @ RepositoryError::VersionConflict { .. }) => {
					warn!("{err}, retrying");
					last_error = Some(err);
				}
				Err(err) => return Err(err.into()),
			}
		}

		Err(last_error
			.map(UseCaseError::from)
			.unwrap_or_else(|| UseCaseError::OrderNotFound {
				order_id: notice.order_id,
			}))
	}
}
