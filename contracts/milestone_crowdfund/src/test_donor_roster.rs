use soroban_sdk::{testutils::Address as _, Address};

use crate::invariants::{assert_goal_flag_monotonic, assert_roster_unique};
use crate::test::{Fixture, T};

#[test]
fn test_roster_starts_empty() {
    let fx = Fixture::new();
    let id = fx.create_campaign(10_000, T + 86_400, &[10_000]);

    assert_eq!(fx.client.get_campaign(&id).donor_count, 0);
    assert!(fx.client.get_donor_list(&id).is_empty());
}

#[test]
fn test_roster_adds_new_donor() {
    let fx = Fixture::new();
    let id = fx.create_campaign(10_000, T + 86_400, &[10_000]);
    let donor = fx.donor(id, 500);

    let donors = fx.client.get_donor_list(&id);
    assert_eq!(donors.len(), 1);
    assert_eq!(donors.get(0), Some(donor));
    assert_eq!(fx.client.get_campaign(&id).donor_count, 1);
}

#[test]
fn test_repeat_donor_listed_once() {
    let fx = Fixture::new();
    let id = fx.create_campaign(10_000, T + 86_400, &[10_000]);
    let donor = fx.funded_donor(1_000);

    fx.client.donate(&id, &donor, &500);
    fx.client.donate(&id, &donor, &300);
    fx.client.donate(&id, &donor, &200);

    let campaign = fx.client.get_campaign(&id);
    let donors = fx.client.get_donor_list(&id);
    assert_eq!(donors.len(), 1);
    assert_eq!(fx.client.get_donation(&id, &donor), 1_000);
    assert_roster_unique(&campaign, &donors);
}

#[test]
fn test_roster_keeps_first_contribution_order() {
    let fx = Fixture::new();
    let id = fx.create_campaign(10_000, T + 86_400, &[10_000]);
    let a = fx.funded_donor(300);
    let b = fx.funded_donor(300);
    let c = fx.funded_donor(300);

    fx.client.donate(&id, &b, &100);
    fx.client.donate(&id, &a, &100);
    fx.client.donate(&id, &b, &100);
    fx.client.donate(&id, &c, &100);
    fx.client.donate(&id, &a, &100);

    let donors = fx.client.get_donor_list(&id);
    assert_eq!(donors.len(), 3);
    assert_eq!(donors.get(0), Some(b));
    assert_eq!(donors.get(1), Some(a));
    assert_eq!(donors.get(2), Some(c));
    assert_roster_unique(&fx.client.get_campaign(&id), &donors);
}

#[test]
fn test_rosters_are_per_campaign() {
    let fx = Fixture::new();
    let first = fx.create_campaign(10_000, T + 86_400, &[10_000]);
    let second = fx.create_campaign(10_000, T + 86_400, &[10_000]);
    let donor = fx.funded_donor(1_000);
    let only_second = Address::generate(&fx.env);
    fx.token_sac.mint(&only_second, &10);

    fx.client.donate(&first, &donor, &400);
    fx.client.donate(&second, &donor, &600);
    fx.client.donate(&second, &only_second, &10);

    assert_eq!(fx.client.get_donor_list(&first).len(), 1);
    assert_eq!(fx.client.get_donor_list(&second).len(), 2);
    assert_eq!(fx.client.get_donation(&first, &donor), 400);
    assert_eq!(fx.client.get_donation(&second, &donor), 600);
    assert_eq!(fx.client.get_donation(&first, &only_second), 0);
}

#[test]
fn test_goal_flag_never_clears_across_donations() {
    let fx = Fixture::new();
    let id = fx.create_campaign(300, T + 86_400, &[300]);
    let donor = fx.funded_donor(1_000);

    let mut before = fx.client.get_campaign(&id).goal_reached;
    for _ in 0..5 {
        fx.client.donate(&id, &donor, &100);
        let after = fx.client.get_campaign(&id).goal_reached;
        assert_goal_flag_monotonic(before, after);
        before = after;
    }
    assert!(before);
}
