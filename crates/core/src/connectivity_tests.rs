// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    up = { false, false, Link::Up, false },
    network = { true, false, Link::NetworkDown, true },
    server = { false, true, Link::ServerDown, true },
    both = { true, true, Link::Both, true },
)]
fn link_and_offline(network_down: bool, server_down: bool, link: Link, offline: bool) {
    let state = ConnectivityState {
        network_down,
        server_down,
    };
    assert_eq!(state.link(), link);
    assert_eq!(state.offline(), offline);
}

#[test]
fn initial_assumes_server_up() {
    assert_eq!(ConnectivityState::initial(false).link(), Link::Up);
    assert_eq!(ConnectivityState::initial(true).link(), Link::NetworkDown);
}

#[test]
fn banner_reflects_offline() {
    assert!(ConnectivityState::default()
        .banner()
        .contains("operational"));
    assert!(ConnectivityState::initial(true)
        .banner()
        .contains("Working offline"));
}

#[test]
fn link_display() {
    assert_eq!(Link::Both.to_string(), "both_down");
    assert_eq!(Link::Up.to_string(), "up");
}
