//! Integration Tests
//!
//! End-to-end scenarios driven through `ManaSharer::call`, the way a host
//! would: owner setup, funding, reservations, withdrawals and the gate.

use proptest::prelude::*;

use crate::*;
use manasharer_common::{
    constants::token::ONE,
    events::{EventType, ManaSharerEvent},
    testing::{MockHost, MockToken},
    types::AuthorizationKind,
};

const POOL: Address = [7u8; 32];
const OWNER: Address = [9u8; 32];
const ALICE: Address = [1u8; 32];
const BOB: Address = [2u8; 32];
const CAROL: Address = [3u8; 32];

struct World {
    sharer: ManaSharer,
    host: MockHost,
    token: MockToken,
}

impl World {
    /// Owned contract; ALICE, BOB and CAROL hold 100 KOIN each
    fn new() -> Self {
        let mut world = Self {
            sharer: ManaSharer::in_memory(ManaSharerConfig::new(POOL).unwrap()),
            host: MockHost::new(),
            token: MockToken::new(),
        };
        for account in [ALICE, BOB, CAROL] {
            world.token.mint(account, 100 * ONE);
        }
        world.sharer.set_owner(&world.host, &mut world.token, OWNER).unwrap();
        world
    }

    fn as_account(&mut self, account: Address) -> &mut Self {
        self.host.act_as(account);
        self
    }

    fn call(&mut self, action: ManaSharerAction) -> ManaShareResult<()> {
        self.sharer.call(&self.host, &mut self.token, &action)
    }

    fn authorize(&self, rc_limit: u64) -> ManaShareResult<()> {
        self.sharer
            .authorize(&self.host, &AuthorizeRequest::apply_transaction(rc_limit))
    }
}

// ============================================================================
// Funding Lifecycle
// ============================================================================

#[test]
fn test_deposit_prepare_withdraw_lifecycle() {
    let mut world = World::new();
    world.as_account(ALICE);

    world.call(ManaSharerAction::Deposit { to: ALICE, amount: 500_000_000 }).unwrap();
    world.call(ManaSharerAction::PrepareWithdraw { to: ALICE, amount: 200_000_000 }).unwrap();
    world.call(ManaSharerAction::Withdraw { to: ALICE, amount: 150_000_000 }).unwrap();

    assert_eq!(world.sharer.balance_of(&ALICE).unwrap(), 350_000_000);
    assert_eq!(world.sharer.pending_withdraw_of(&ALICE).unwrap(), 50_000_000);
    assert_eq!(world.sharer.koin_reserved().unwrap(), 50_000_000);
    assert_eq!(world.token.balance_of(&POOL), 350_000_000);
    assert_eq!(world.token.balance_of(&ALICE), 100 * ONE - 350_000_000);

    let withdraws = world.sharer.events().filter_by_type(EventType::Withdraw);
    assert_eq!(
        withdraws,
        vec![&ManaSharerEvent::Withdraw {
            to: ALICE,
            amount: 150_000_000,
            new_balance: 350_000_000,
            settled: 150_000_000,
        }]
    );
}

#[test]
fn test_deposit_on_behalf_of_another_account() {
    // Token allows the transfer; the sharer does not check the caller
    let mut world = World::new();
    world.as_account(BOB);

    world.call(ManaSharerAction::Deposit { to: ALICE, amount: ONE }).unwrap();
    assert_eq!(world.sharer.balance_of(&ALICE).unwrap(), ONE);

    // Only ALICE can take it back out
    let result = world.call(ManaSharerAction::Withdraw { to: ALICE, amount: ONE });
    assert_eq!(result, Err(ManaShareError::Unauthorized { account: ALICE }));
}

#[test]
fn test_deposit_without_owner() {
    let mut sharer = ManaSharer::in_memory(ManaSharerConfig::new(POOL).unwrap());
    let host = MockHost::new();
    let mut token = MockToken::new();
    token.mint(ALICE, ONE);

    let result = sharer.deposit(&host, &mut token, ALICE, ONE);
    assert_eq!(result, Err(ManaShareError::OwnerNotSet));
    assert!(token.transfers().is_empty());
    assert!(sharer.events().is_empty());
}

#[test]
fn test_over_withdraw_leaves_state_untouched() {
    let mut world = World::new();
    world.as_account(ALICE);
    world.call(ManaSharerAction::Deposit { to: ALICE, amount: ONE }).unwrap();
    world.call(ManaSharerAction::PrepareWithdraw { to: ALICE, amount: ONE }).unwrap();

    let digest = world.sharer.store().digest();
    let events = world.sharer.events().len();

    let result = world.call(ManaSharerAction::Withdraw { to: ALICE, amount: ONE + 1 });
    assert_eq!(
        result,
        Err(ManaShareError::InsufficientBalance { available: ONE, requested: ONE + 1 })
    );
    assert_eq!(world.sharer.store().digest(), digest);
    assert_eq!(world.sharer.events().len(), events);
}

#[test]
fn test_token_failure_rolls_back() {
    let mut world = World::new();
    world.as_account(ALICE);
    world.call(ManaSharerAction::Deposit { to: ALICE, amount: ONE }).unwrap();
    world.call(ManaSharerAction::PrepareWithdraw { to: ALICE, amount: ONE }).unwrap();
    world.token.freeze(POOL);

    let digest = world.sharer.store().digest();
    let result = world.call(ManaSharerAction::Withdraw { to: ALICE, amount: ONE });
    assert!(matches!(result, Err(ManaShareError::TransferFailed { .. })));
    assert_eq!(world.sharer.store().digest(), digest);
    assert_eq!(world.sharer.koin_reserved().unwrap(), ONE);
}

// ============================================================================
// Gate
// ============================================================================

#[test]
fn test_gate_admits_against_reserved_capacity() {
    let mut world = World::new();
    world.as_account(OWNER);
    world.call(ManaSharerAction::SetRcLimit { value: 1_000_000_000 }).unwrap();

    world.as_account(ALICE);
    world.call(ManaSharerAction::Deposit { to: ALICE, amount: 100_000_000 }).unwrap();
    world.call(ManaSharerAction::PrepareWithdraw { to: ALICE, amount: 50_000_000 }).unwrap();
    world.host.set_mana(POOL, 1_000_000_000);

    // 950M available
    assert!(world.authorize(100_000_000).is_ok());
    assert!(world.authorize(950_000_000).is_ok());
    assert_eq!(
        world.authorize(950_000_001),
        Err(ManaShareError::InsufficientMana {
            available: 950_000_000,
            requested: 950_000_001,
        })
    );
}

#[test]
fn test_gate_enforces_ceiling() {
    let mut world = World::new();
    world.host.set_mana(POOL, 100 * ONE);
    world.as_account(OWNER);
    world.call(ManaSharerAction::SetRcLimit { value: 10 * ONE }).unwrap();

    let err = world.authorize(15 * ONE).unwrap_err();
    assert_eq!(err.kind(), manasharer_common::errors::ErrorKind::CeilingExceeded);
    assert!(err.to_string().contains("max rc limit of 10 mana"));
    assert!(world.authorize(10 * ONE).is_ok());
}

#[test]
fn test_gate_releases_capacity_on_settlement() {
    let mut world = World::new();
    world.host.set_mana(POOL, 10 * ONE);
    world.as_account(ALICE);
    world.call(ManaSharerAction::Deposit { to: ALICE, amount: 5 * ONE }).unwrap();
    world.call(ManaSharerAction::PrepareWithdraw { to: ALICE, amount: 5 * ONE }).unwrap();

    assert!(world.authorize(6 * ONE).is_err());

    world.call(ManaSharerAction::Withdraw { to: ALICE, amount: 5 * ONE }).unwrap();
    assert_eq!(world.sharer.koin_reserved().unwrap(), 0);
    assert!(world.authorize(6 * ONE).is_ok());
}

#[test]
fn test_gate_other_kinds() {
    let mut world = World::new();
    let call = AuthorizeRequest::other(AuthorizationKind::ContractCall);

    assert_eq!(
        world.sharer.authorize(&world.host, &call),
        Err(ManaShareError::SystemAuthorityRequired)
    );

    world.host.set_system_authority(true);
    assert!(world.sharer.authorize(&world.host, &call).is_ok());
}

// ============================================================================
// Status and Events
// ============================================================================

#[test]
fn test_status_snapshot() {
    let mut world = World::new();
    world.host.set_mana(POOL, 3 * ONE);
    world.as_account(OWNER);
    world.call(ManaSharerAction::SetRecommendedManaOffset { value: ONE / 10 }).unwrap();

    world.as_account(ALICE);
    world.call(ManaSharerAction::Deposit { to: ALICE, amount: 2 * ONE }).unwrap();
    world.call(ManaSharerAction::PrepareWithdraw { to: ALICE, amount: ONE }).unwrap();

    let status = world.sharer.get_status(&world.host, &world.token).unwrap();
    assert_eq!(status.mana, 3 * ONE);
    assert_eq!(status.koin_balance, 2 * ONE);
    assert_eq!(status.koin_reserved, ONE);
    assert_eq!(status.mana_available, 2 * ONE);
    assert_eq!(status.koin_available, ONE);
    assert_eq!(status.recommended_mana_offset, ONE / 10);
}

#[test]
fn test_event_history_per_account() {
    let mut world = World::new();
    world.as_account(ALICE);
    world.call(ManaSharerAction::Deposit { to: ALICE, amount: ONE }).unwrap();
    world.as_account(BOB);
    world.call(ManaSharerAction::Deposit { to: BOB, amount: ONE }).unwrap();
    world.call(ManaSharerAction::PrepareWithdraw { to: BOB, amount: ONE }).unwrap();

    let events = world.sharer.events();
    assert_eq!(events.for_account(&ALICE).len(), 1);
    assert_eq!(events.for_account(&BOB).len(), 2);
    assert_eq!(events.filter_by_type(EventType::OwnerSet).len(), 1);
    assert_eq!(events.filter_by_type(EventType::Deposit).len(), 2);
}

// ============================================================================
// Properties
// ============================================================================

const ACCOUNTS: [Address; 3] = [ALICE, BOB, CAROL];

#[derive(Debug, Clone)]
enum Op {
    Deposit(usize, u64),
    Prepare(usize, u64),
    Withdraw(usize, u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 0..60 * ONE).prop_map(|(i, amount)| Op::Deposit(i, amount)),
        (0..3usize, 0..60 * ONE).prop_map(|(i, amount)| Op::Prepare(i, amount)),
        (0..3usize, 0..60 * ONE).prop_map(|(i, amount)| Op::Withdraw(i, amount)),
    ]
}

proptest! {
    #[test]
    fn prop_reserved_tracks_pending(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let mut world = World::new();
        let mut balances = [0u64; 3];
        let mut wallets = [100 * ONE; 3];

        for op in ops {
            let digest = world.sharer.store().digest();
            match op {
                Op::Deposit(i, amount) => {
                    world.as_account(ACCOUNTS[i]);
                    let result = world.call(ManaSharerAction::Deposit { to: ACCOUNTS[i], amount });
                    prop_assert_eq!(result.is_ok(), amount <= wallets[i]);
                    if result.is_ok() {
                        balances[i] += amount;
                        wallets[i] -= amount;
                    }
                }
                Op::Prepare(i, amount) => {
                    world.as_account(ACCOUNTS[i]);
                    let result = world.call(ManaSharerAction::PrepareWithdraw { to: ACCOUNTS[i], amount });
                    prop_assert!(result.is_ok());
                }
                Op::Withdraw(i, amount) => {
                    world.as_account(ACCOUNTS[i]);
                    let result = world.call(ManaSharerAction::Withdraw { to: ACCOUNTS[i], amount });
                    prop_assert_eq!(result.is_ok(), amount <= balances[i]);
                    if result.is_ok() {
                        balances[i] -= amount;
                        wallets[i] += amount;
                    } else {
                        prop_assert_eq!(world.sharer.store().digest(), digest);
                    }
                }
            }

            let mut pending_sum = 0u64;
            for (i, account) in ACCOUNTS.iter().enumerate() {
                pending_sum += world.sharer.pending_withdraw_of(account).unwrap();
                prop_assert_eq!(world.sharer.balance_of(account).unwrap(), balances[i]);
            }
            prop_assert_eq!(world.sharer.koin_reserved().unwrap(), pending_sum);
            prop_assert_eq!(world.token.balance_of(&POOL), balances.iter().sum::<u64>());
        }
    }

    #[test]
    fn prop_gate_admits_iff_both_limits_hold(
        mana in 0..1_000 * ONE,
        reserved in 0..1_000 * ONE,
        ceiling in 0..1_000 * ONE,
        rc_limit in 0..1_000 * ONE,
    ) {
        let mut world = World::new();
        world.host.set_mana(POOL, mana);
        world.as_account(OWNER);
        world.call(ManaSharerAction::SetRcLimit { value: ceiling }).unwrap();
        // Reservations are not bounded by balance, so one account can hold them all
        world.as_account(CAROL);
        world.call(ManaSharerAction::PrepareWithdraw { to: CAROL, amount: reserved }).unwrap();

        let admitted = world.authorize(rc_limit).is_ok();
        prop_assert_eq!(admitted, rc_limit <= mana.saturating_sub(reserved) && rc_limit <= ceiling);
    }
}
