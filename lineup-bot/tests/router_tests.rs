//! Event router integration tests
//!
//! Drive the router with synthetic events against the in-memory platform.

mod helpers;

use helpers::*;
use lineup_bot::router::{full_notice, CLEAR_CONFIRMATION, PING_REPLY};
use lineup_common::events::SlashCommand;
use lineup_common::UserId;

#[tokio::test]
async fn test_role_call_promotes_anchor_and_auto_joins_author() {
    let (platform, router) = connected_router(5).await;
    platform.seed_message(anchor(200), "<@&500> who's in?");

    router.handle(role_call(200, 11, "Ada")).await;

    let snapshot = router.snapshot().await;
    assert_eq!(snapshot.anchors, vec![anchor(200)]);
    assert_eq!(snapshot.participant_names(), vec!["Ada"]);
    assert!(platform.has_own_reaction(anchor(200)));

    let display = snapshot.display.expect("display posted");
    let content = platform.content_of(display).unwrap();
    assert!(content.contains("1. Ada"), "render was: {}", content);
}

#[tokio::test]
async fn test_message_without_target_role_is_ignored() {
    let (platform, router) = connected_router(5).await;

    router.handle(message(200, 11, "Ada", &[OTHER_ROLE])).await;
    router.handle(message(201, 11, "Ada", &[])).await;

    let snapshot = router.snapshot().await;
    assert!(snapshot.anchors.is_empty());
    assert!(snapshot.participants.is_empty());
    assert_eq!(platform.write_count(), 0);
}

#[tokio::test]
async fn test_bot_own_message_is_ignored() {
    let (platform, router) = connected_router(5).await;

    router.handle(role_call(200, BOT.get(), "Lineup")).await;

    assert!(router.snapshot().await.anchors.is_empty());
    assert_eq!(platform.write_count(), 0);
}

#[tokio::test]
async fn test_failed_bot_reaction_prevents_promotion() {
    let (platform, router) = connected_router(5).await;
    platform.fail_add_reaction(true);

    router.handle(role_call(200, 11, "Ada")).await;

    let snapshot = router.snapshot().await;
    assert!(snapshot.anchors.is_empty());
    assert!(snapshot.participants.is_empty());
    assert!(platform.sent().is_empty());
}

#[tokio::test]
async fn test_repeated_role_call_by_participant_does_not_resync() {
    let (platform, router) = connected_router(5).await;

    router.handle(role_call(200, 11, "Ada")).await;
    router.handle(role_call(201, 11, "Ada")).await;

    let snapshot = router.snapshot().await;
    assert_eq!(snapshot.anchors, vec![anchor(200), anchor(201)]);
    assert_eq!(snapshot.participant_names(), vec!["Ada"]);
    assert_eq!(platform.sent().len(), 1);
    assert!(platform.edits().is_empty());
}

#[tokio::test]
async fn test_full_lineup_renders_ready_and_notifies_sixth_user() {
    let (platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "User11")).await;

    for user in 11..=15 {
        router.handle(rich_add(200, user, &format!("User{}", user))).await;
    }

    let snapshot = router.snapshot().await;
    assert_eq!(
        snapshot.participant_names(),
        vec!["User11", "User12", "User13", "User14", "User15"]
    );
    let ready = snapshot.rendered.clone();
    assert!(ready.contains("(READY)"));
    for user in 11..=15 {
        assert!(ready.contains(&format!("<@{}>", user)));
    }
    for (i, user) in (11..=15).enumerate() {
        assert!(ready.contains(&format!("{}. User{}", i + 1, user)));
    }

    let display = snapshot.display.unwrap();
    assert_eq!(platform.content_of(display).unwrap(), ready);
    let writes_before = platform.edits().len() + platform.sent().len();

    router.handle(rich_add(200, 16, "User16")).await;

    assert_eq!(platform.notices(), vec![(CHANNEL, full_notice(5))]);
    assert_eq!(router.snapshot().await.rendered, ready);
    assert_eq!(platform.edits().len() + platform.sent().len(), writes_before);
}

#[tokio::test]
async fn test_participant_reacting_again_on_full_lineup_gets_no_notice() {
    let (platform, router) = connected_router(2).await;
    router.handle(role_call(200, 11, "Ada")).await;
    router.handle(rich_add(200, 12, "Bob")).await;

    router.handle(rich_add(200, 12, "Bob")).await;

    assert!(platform.notices().is_empty());
}

#[tokio::test]
async fn test_raw_add_on_full_lineup_is_silent() {
    let (platform, router) = connected_router(1).await;
    router.handle(role_call(200, 11, "Ada")).await;

    router.handle(raw_add(200, 12)).await;

    assert!(platform.notices().is_empty());
    assert_eq!(router.snapshot().await.participant_names(), vec!["Ada"]);
}

#[tokio::test]
async fn test_removal_preserves_relative_order() {
    let (_platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "User11")).await;
    for user in 12..=15 {
        router.handle(rich_add(200, user, &format!("User{}", user))).await;
    }

    router.handle(remove(200, 13)).await;

    let snapshot = router.snapshot().await;
    assert_eq!(
        snapshot.participant_names(),
        vec!["User11", "User12", "User14", "User15"]
    );
    assert!(!snapshot.rendered.contains("(READY)"));
    assert!(snapshot.rendered.contains("4. User15"));
    assert!(!snapshot.rendered.contains("5."));
}

#[tokio::test]
async fn test_removing_non_participant_is_noop() {
    let (platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;
    let writes = platform.write_count();

    router.handle(remove(200, 99)).await;

    assert_eq!(platform.write_count(), writes);
    assert_eq!(router.snapshot().await.participant_names(), vec!["Ada"]);
}

#[tokio::test]
async fn test_reactions_on_non_anchor_never_mutate() {
    let (platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;
    let before = router.snapshot().await;
    let writes = platform.write_count();

    router.handle(rich_add(999, 12, "Bob")).await;
    router.handle(raw_add(999, 13)).await;
    router.handle(add_with_emoji(999, 14, "❌")).await;
    router.handle(remove(999, 11)).await;

    assert_eq!(router.snapshot().await, before);
    assert_eq!(platform.write_count(), writes);
}

#[tokio::test]
async fn test_mismatched_emoji_on_anchor_is_ignored() {
    let (_platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;

    router.handle(add_with_emoji(200, 12, "❌")).await;

    assert_eq!(router.snapshot().await.participant_names(), vec!["Ada"]);
}

#[tokio::test]
async fn test_bot_reactions_are_ignored() {
    let (_platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;

    router.handle(rich_add(200, BOT.get(), "Lineup")).await;
    router.handle(remove(200, BOT.get())).await;

    assert_eq!(router.snapshot().await.participant_names(), vec!["Ada"]);
}

#[tokio::test]
async fn test_raw_add_resolves_member_name() {
    let (platform, router) = connected_router(5).await;
    platform.set_member_name(UserId(12), "Grace");
    router.handle(role_call(200, 11, "Ada")).await;

    router.handle(raw_add(200, 12)).await;

    assert_eq!(router.snapshot().await.participant_names(), vec!["Ada", "Grace"]);
    assert_eq!(platform.member_lookups(), 1);
}

#[tokio::test]
async fn test_raw_add_falls_back_to_synthetic_name() {
    let (_platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;

    router.handle(raw_add(200, 42)).await;

    assert_eq!(
        router.snapshot().await.participant_names(),
        vec!["Ada", "user_42"]
    );
}

#[tokio::test]
async fn test_rich_add_skips_member_lookup() {
    let (platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;

    router.handle(rich_add(200, 12, "Bob")).await;

    assert_eq!(platform.member_lookups(), 0);
}

#[tokio::test]
async fn test_clear_resets_lineup_and_retracts_reactions() {
    let (platform, router) = connected_router(5).await;
    platform.seed_message(anchor(200), "<@&500> round one");
    platform.seed_message(anchor(201), "<@&500> round two");
    router.handle(role_call(200, 11, "Ada")).await;
    router.handle(role_call(201, 12, "Bob")).await;
    router.handle(rich_add(200, 13, "Cy")).await;
    assert_eq!(router.snapshot().await.participants.len(), 3);

    router.handle(command(SlashCommand::Clear, 11)).await;

    let snapshot = router.snapshot().await;
    assert!(snapshot.participants.is_empty());
    assert!(snapshot.anchors.is_empty());
    assert!(!platform.has_own_reaction(anchor(200)));
    assert!(!platform.has_own_reaction(anchor(201)));
    assert_eq!(
        platform.interactions(),
        vec![
            InteractionCall::Defer,
            InteractionCall::Finish(CLEAR_CONFIRMATION.to_string()),
        ]
    );

    let display = snapshot.display.unwrap();
    assert!(platform
        .content_of(display)
        .unwrap()
        .contains("Lineup is empty"));
}

#[tokio::test]
async fn test_clear_continues_past_failed_retraction() {
    let (platform, router) = connected_router(5).await;
    platform.seed_message(anchor(200), "<@&500> round one");
    platform.seed_message(anchor(201), "<@&500> round two");
    router.handle(role_call(200, 11, "Ada")).await;
    router.handle(role_call(201, 12, "Bob")).await;
    platform.make_unfetchable(anchor(200));

    router.handle(command(SlashCommand::Clear, 11)).await;

    assert_eq!(platform.reactions_removed(), vec![anchor(201)]);
    assert!(platform.has_own_reaction(anchor(200)));
    assert!(!platform.has_own_reaction(anchor(201)));
    assert!(router.snapshot().await.anchors.is_empty());
    assert_eq!(
        platform.interactions().last(),
        Some(&InteractionCall::Finish(CLEAR_CONFIRMATION.to_string()))
    );
}

#[tokio::test]
async fn test_clear_survives_reaction_removal_errors() {
    let (platform, router) = connected_router(5).await;
    platform.seed_message(anchor(200), "<@&500>");
    router.handle(role_call(200, 11, "Ada")).await;
    platform.fail_remove_reaction(true);

    router.handle(command(SlashCommand::Clear, 11)).await;

    let snapshot = router.snapshot().await;
    assert!(snapshot.participants.is_empty());
    assert!(snapshot.anchors.is_empty());
    assert_eq!(
        platform.interactions().last(),
        Some(&InteractionCall::Finish(CLEAR_CONFIRMATION.to_string()))
    );
}

#[tokio::test]
async fn test_old_anchor_inactive_after_clear() {
    let (_platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;
    router.handle(command(SlashCommand::Clear, 11)).await;

    router.handle(rich_add(200, 12, "Bob")).await;

    assert!(router.snapshot().await.participants.is_empty());
}

#[tokio::test]
async fn test_ping_replies_without_touching_state() {
    let (platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;
    let before = router.snapshot().await;

    router.handle(command(SlashCommand::Ping, 11)).await;

    assert_eq!(
        platform.interactions(),
        vec![InteractionCall::Respond(PING_REPLY.to_string())]
    );
    assert_eq!(router.snapshot().await, before);
}

#[tokio::test]
async fn test_reconnect_resets_roster_and_anchors() {
    let (_platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;
    let display = router.snapshot().await.display;

    router.handle(connected()).await;

    let snapshot = router.snapshot().await;
    assert!(snapshot.participants.is_empty());
    assert!(snapshot.anchors.is_empty());
    assert_eq!(snapshot.display, display);
    assert_eq!(router.bot_user_id(), Some(BOT));
}

#[tokio::test]
async fn test_deleted_display_is_recreated_on_next_add() {
    let (platform, router) = connected_router(5).await;
    router.handle(role_call(200, 11, "Ada")).await;
    let original = router.snapshot().await.display.unwrap();

    platform.delete_message(original);
    router.handle(rich_add(200, 12, "Bob")).await;

    let recreated = router.snapshot().await.display.unwrap();
    assert_ne!(recreated, original);
    let content = platform.content_of(recreated).unwrap();
    assert!(content.contains("1. Ada"));
    assert!(content.contains("2. Bob"));
}
