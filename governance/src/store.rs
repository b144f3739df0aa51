//! Creation and lookup of withdrawal requests.

use crate::error::GovernanceError;
use crate::request::{RequestStatus, WithdrawalRequest};
use coffer_types::{Address, GovernanceParams, RequestId, Timestamp};
use serde::{Deserialize, Serialize};

/// Owns every withdrawal request ever created.
///
/// Requests are indexed by their sequential id: `requests[id]` is request `id`.
/// Nothing is ever removed; a settled request is only marked resolved.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestStore {
    /// The single identity allowed to open requests.
    owner: Address,
    params: GovernanceParams,
    requests: Vec<WithdrawalRequest>,
}

impl RequestStore {
    pub fn new(owner: Address, params: GovernanceParams) -> Self {
        Self {
            owner,
            params,
            requests: Vec::new(),
        }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    /// Open a new withdrawal request.
    ///
    /// `pool_balance` is the treasury's current holding; the request may not
    /// ask for more than that. The deadline is `now + duration_secs`.
    pub fn initiate_withdrawal(
        &mut self,
        caller: &Address,
        amount: u128,
        description: impl Into<String>,
        duration_secs: u64,
        pool_balance: u128,
        now: Timestamp,
    ) -> Result<RequestId, GovernanceError> {
        if *caller != self.owner {
            return Err(GovernanceError::Unauthorized(caller.clone()));
        }
        if amount == 0 {
            return Err(GovernanceError::InvalidAmount);
        }
        if amount > pool_balance {
            return Err(GovernanceError::InsufficientPoolFunds {
                requested: amount,
                available: pool_balance,
            });
        }
        if duration_secs <= self.params.min_duration_secs {
            return Err(GovernanceError::InvalidDuration {
                duration: duration_secs,
                min: self.params.min_duration_secs,
            });
        }
        let deadline = now
            .checked_add_secs(duration_secs)
            .ok_or(GovernanceError::Overflow)?;
        let id = self.next_id()?;

        self.requests.push(WithdrawalRequest {
            id,
            requester: caller.clone(),
            amount,
            description: description.into(),
            created_at: now,
            deadline,
            yes_weight: 0,
            no_weight: 0,
            resolved: false,
            executed: false,
        });
        tracing::debug!(id = %id, amount, deadline = %deadline, "withdrawal request stored");
        Ok(id)
    }

    pub fn get(&self, id: RequestId) -> Result<&WithdrawalRequest, GovernanceError> {
        self.requests
            .get(Self::index(id)?)
            .ok_or(GovernanceError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: RequestId) -> Result<&mut WithdrawalRequest, GovernanceError> {
        let index = Self::index(id)?;
        self.requests
            .get_mut(index)
            .ok_or(GovernanceError::NotFound(id))
    }

    pub fn status(&self, id: RequestId, now: Timestamp) -> Result<RequestStatus, GovernanceError> {
        Ok(self.get(id)?.status(now))
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WithdrawalRequest> {
        self.requests.iter()
    }

    fn next_id(&self) -> Result<RequestId, GovernanceError> {
        match self.requests.last() {
            Some(last) => last.id.next().ok_or(GovernanceError::Overflow),
            None => Ok(RequestId::FIRST),
        }
    }

    fn index(id: RequestId) -> Result<usize, GovernanceError> {
        usize::try_from(id.raw()).map_err(|_| GovernanceError::NotFound(id))
    }
}
