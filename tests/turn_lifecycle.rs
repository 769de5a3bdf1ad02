//! Turn lifecycle: discard gate, crown thresholds, repeat turns, scrolls

use gem_duel::board::{spiral_order, Pos};
use gem_duel::core::{CardId, CardLevel, RoyalId, Seat, TokenKind};
use gem_duel::game::{CardSource, Game, Interaction, Progress};

fn adjacent_gem_pair(game: &Game) -> (Pos, Pos) {
    for pos in spiral_order() {
        let kind = game.state.board.token_at(pos);
        if kind.is_none() || kind == Some(TokenKind::Gold) {
            continue;
        }
        for (dr, dc) in [(0i16, 1i16), (1, 0), (1, 1), (1, -1)] {
            let row = pos.row as i16 + dr;
            let col = pos.col as i16 + dc;
            if !(0..5).contains(&row) || !(0..5).contains(&col) {
                continue;
            }
            let other = Pos::new(row as u8, col as u8);
            let other_kind = game.state.board.token_at(other);
            if other_kind.is_some() && other_kind != Some(TokenKind::Gold) {
                return (pos, other);
            }
        }
    }
    panic!("no adjacent gem pair on the board");
}

#[test]
fn test_discard_gate_enforces_token_cap() {
    let mut game = Game::new(2);
    game.state.player_mut(Seat::One).tokens.add(TokenKind::Blue, 9);

    let (a, b) = adjacent_gem_pair(&game);
    let progress = game.take_tokens(&[a, b]).unwrap();
    assert_eq!(progress, Progress::AwaitingInteraction);
    assert_eq!(
        *game.interaction(),
        Interaction::AwaitingDiscard { excess: 1 }
    );

    // Wrong count refused
    assert!(game
        .discard_tokens(&[TokenKind::Blue, TokenKind::Blue])
        .is_err());
    // Discarding something not held refused
    assert!(game.discard_tokens(&[TokenKind::Gold]).is_err());

    let bag_before = game.state.bag;
    let progress = game.discard_tokens(&[TokenKind::Blue]).unwrap();
    assert_eq!(progress, Progress::TurnEnded);
    assert_eq!(game.state.player(Seat::One).total_tokens(), 10);
    // Discards return to the bag
    assert_eq!(game.state.bag.blue, bag_before.blue + 1);
}

#[test]
fn test_crown_threshold_awards_royal_once_per_band() {
    let mut game = Game::new(2);

    // Cards 5, 11 and 17 each carry one crown (from the fixed set)
    let player = game.state.player_mut(Seat::One);
    player.cards.push(CardId::new(5));
    player.cards.push(CardId::new(11));
    player.cards.push(CardId::new(17));

    // Any completed action runs the threshold check
    let (a, _) = adjacent_gem_pair(&game);
    let progress = game.take_tokens(&[a]).unwrap();
    assert_eq!(progress, Progress::AwaitingInteraction);
    assert_eq!(*game.interaction(), Interaction::AwaitingRoyal);

    // Claim the plain 3-point royal
    let progress = game.choose_royal(RoyalId::new(1)).unwrap();
    assert_eq!(progress, Progress::TurnEnded);
    assert!(game.state.royal(RoyalId::new(1)).unwrap().taken);
    assert_eq!(game.points(Seat::One), 3);

    // Taking an already-taken royal is refused later on
    assert!(game.state.untaken_royals().len() == 3);

    // Opponent turn passes back
    let (c, _) = adjacent_gem_pair(&game);
    game.take_tokens(&[c]).unwrap();
    assert_eq!(game.state.current, Seat::One);

    // Another crown within [3,5] must not re-fire the band
    game.state.player_mut(Seat::One).cards.push(CardId::new(23));
    let (d, _) = adjacent_gem_pair(&game);
    let progress = game.take_tokens(&[d]).unwrap();
    assert_eq!(progress, Progress::TurnEnded);

    // Crossing into >=6 fires the second band
    let player = game.state.player_mut(Seat::Two);
    player.cards.push(CardId::new(5));
    player.cards.push(CardId::new(11));
    player.cards.push(CardId::new(17));
    player.cards.push(CardId::new(23));
    player.cards.push(CardId::new(29));
    player.cards.push(CardId::new(51)); // two crowns: 7 total
    let (e, _) = adjacent_gem_pair(&game);
    let progress = game.take_tokens(&[e]).unwrap();
    assert_eq!(progress, Progress::AwaitingInteraction);

    // Both bands were crossed at once: two royal choices are due
    game.choose_royal(RoyalId::new(3)).unwrap();
    // Royal 3 steals; seat One holds tokens from earlier takes
    if *game.interaction() == Interaction::AwaitingSteal {
        let kind = game
            .state
            .player(Seat::One)
            .tokens
            .iter_nonzero()
            .map(|(kind, _)| kind)
            .find(|kind| !kind.is_gold())
            .unwrap();
        game.resolve_steal(kind).unwrap();
    }
    assert_eq!(*game.interaction(), Interaction::AwaitingRoyal);
    let progress = game.choose_royal(RoyalId::new(4)).unwrap();
    // Royal 4 grants a scroll immediately; then the turn completes
    assert_eq!(progress, Progress::TurnEnded);
    assert_eq!(game.state.player(Seat::Two).royals.len(), 2);
}

#[test]
fn test_royal_with_again_ability_repeats_turn() {
    let mut game = Game::new(2);

    let player = game.state.player_mut(Seat::One);
    player.cards.push(CardId::new(5));
    player.cards.push(CardId::new(11));
    player.cards.push(CardId::new(17));

    let (a, _) = adjacent_gem_pair(&game);
    game.take_tokens(&[a]).unwrap();
    assert_eq!(*game.interaction(), Interaction::AwaitingRoyal);

    // Royal 2 carries Again: the turn repeats instead of passing
    let progress = game.choose_royal(RoyalId::new(2)).unwrap();
    assert_eq!(progress, Progress::TurnRepeats);
    assert_eq!(game.state.current, Seat::One);

    // The repeated turn allows a fresh main action, then ends normally
    let (b, _) = adjacent_gem_pair(&game);
    let progress = game.take_tokens(&[b]).unwrap();
    assert_eq!(progress, Progress::TurnEnded);
    assert_eq!(game.state.current, Seat::Two);
}

#[test]
fn test_steal_ability_chain_from_purchase() {
    let mut game = Game::new(2);

    // Card 12: level-one Steal ability, costs 3 blue + 1 pearl
    let steal_id = CardId::new(12);
    game.state.pyramid[0][0] = Some(steal_id);
    {
        let player = game.state.player_mut(Seat::One);
        player.tokens.add(TokenKind::Blue, 3);
        player.tokens.add(TokenKind::Pearl, 1);
    }
    game.state.player_mut(Seat::Two).tokens.add(TokenKind::Red, 2);

    let source = CardSource::Pyramid {
        level: CardLevel::One,
        slot: 0,
    };
    let progress = game.purchase(source, None).unwrap();
    assert_eq!(progress, Progress::AwaitingInteraction);
    assert_eq!(*game.interaction(), Interaction::AwaitingSteal);

    // Gold cannot be stolen, a kind the opponent lacks cannot be stolen
    assert!(game.resolve_steal(TokenKind::Gold).is_err());
    assert!(game.resolve_steal(TokenKind::Green).is_err());

    let progress = game.resolve_steal(TokenKind::Red).unwrap();
    assert_eq!(progress, Progress::TurnEnded);
    assert_eq!(game.state.player(Seat::One).tokens.red, 1);
    assert_eq!(game.state.player(Seat::Two).tokens.red, 1);
}

#[test]
fn test_steal_ability_noops_when_opponent_empty() {
    let mut game = Game::new(2);

    let steal_id = CardId::new(12);
    game.state.pyramid[0][0] = Some(steal_id);
    {
        let player = game.state.player_mut(Seat::One);
        player.tokens.add(TokenKind::Blue, 3);
        player.tokens.add(TokenKind::Pearl, 1);
    }

    let source = CardSource::Pyramid {
        level: CardLevel::One,
        slot: 0,
    };
    // Opponent holds nothing: the ability silently falls through
    let progress = game.purchase(source, None).unwrap();
    assert_eq!(progress, Progress::TurnEnded);
}

#[test]
fn test_bonus_token_ability_chain() {
    let mut game = Game::new(2);

    // Card 3: blue card with the Token ability
    let token_id = CardId::new(3);
    game.state.pyramid[0][0] = Some(token_id);
    {
        let card = game.state.cards.get(token_id).unwrap().clone();
        let player = game.state.player_mut(Seat::One);
        for (kind, amount) in card.cost.iter_nonzero() {
            player.tokens.add(kind, amount);
        }
    }

    let source = CardSource::Pyramid {
        level: CardLevel::One,
        slot: 0,
    };
    let progress = game.purchase(source, None).unwrap();
    assert_eq!(progress, Progress::AwaitingInteraction);
    assert_eq!(
        *game.interaction(),
        Interaction::AwaitingBonusToken {
            color: TokenKind::Blue
        }
    );

    // Must pick a blue token, nothing else
    let blue_pos = spiral_order()
        .into_iter()
        .find(|&pos| game.state.board.token_at(pos) == Some(TokenKind::Blue))
        .unwrap();
    let red_pos = spiral_order()
        .into_iter()
        .find(|&pos| game.state.board.token_at(pos) == Some(TokenKind::Red))
        .unwrap();
    assert!(game.resolve_bonus_token(red_pos).is_err());

    let progress = game.resolve_bonus_token(blue_pos).unwrap();
    assert_eq!(progress, Progress::TurnEnded);
    assert_eq!(game.state.player(Seat::One).tokens.blue, 1);
}

#[test]
fn test_scrolls_are_conserved_through_takes() {
    let mut game = Game::new(2);
    assert_eq!(game.state.scrolls_in_play(), 3);

    // A matching-color triple hands the opponent a scroll
    let triple = spiral_order()
        .into_iter()
        .find_map(|pos| {
            let kind = game.state.board.token_at(pos)?;
            if kind.is_gold() {
                return None;
            }
            // Horizontal triples only, scanning from each cell
            if pos.col + 2 >= 5 {
                return None;
            }
            let b = Pos::new(pos.row, pos.col + 1);
            let c = Pos::new(pos.row, pos.col + 2);
            if game.state.board.token_at(b) == Some(kind)
                && game.state.board.token_at(c) == Some(kind)
            {
                Some([pos, b, c])
            } else {
                None
            }
        });

    if let Some(positions) = triple {
        game.take_tokens(&positions).unwrap();
        assert_eq!(game.state.player(Seat::Two).privileges, 1);
        assert_eq!(game.state.scrolls_in_play(), 3);
    }

    // Taking two pearls awards a scroll to the opponent of the taker
    let mut game = Game::new(2);
    let pearls: Vec<Pos> = spiral_order()
        .into_iter()
        .filter(|&pos| game.state.board.token_at(pos) == Some(TokenKind::Pearl))
        .collect();
    assert_eq!(pearls.len(), 2);

    let dr = (pearls[0].row as i16 - pearls[1].row as i16).abs();
    let dc = (pearls[0].col as i16 - pearls[1].col as i16).abs();
    if dr.max(dc) == 1 {
        let taker = game.state.current;
        game.take_tokens(&[pearls[0], pearls[1]]).unwrap();
        assert_eq!(game.state.player(taker.opponent()).privileges, 1);
        assert_eq!(game.state.scrolls_in_play(), 3);
    }
}

#[test]
fn test_cap_warning_is_informational() {
    let mut game = Game::new(2);

    let steal_id = CardId::new(12);
    game.state.pyramid[0][0] = Some(steal_id);
    let source = CardSource::Pyramid {
        level: CardLevel::One,
        slot: 0,
    };

    // Player holds ten tokens and could pay without spending most of them
    {
        let player = game.state.player_mut(Seat::One);
        player.tokens.add(TokenKind::Blue, 3);
        player.tokens.add(TokenKind::Pearl, 1);
        player.tokens.add(TokenKind::Green, 6);
    }
    game.state.player_mut(Seat::Two).tokens.add(TokenKind::Red, 1);

    // 10 held, spend 4, steal 1 back: 7 - no warning
    assert!(game.cap_warning(source).unwrap().is_none());

    // With a fatter hand the steal would overflow the cap
    game.state.player_mut(Seat::One).tokens.add(TokenKind::White, 4);
    let warning = game.cap_warning(source).unwrap();
    assert!(warning.is_some());

    // The warning does not block the purchase itself
    let progress = game.purchase(source, None).unwrap();
    assert_eq!(progress, Progress::AwaitingInteraction);
}
