//! Pure scoring rules: player boards, the kill-shot track and final ranking.

use crate::state::{KILL_TRACK_POINTS, KILL_TRACK_TAIL, KillShotTrack, PlayerBoard, PlayerColor, UserPlayer};

/// Points earned from one player board.
///
/// Dealers are ranked by damage dealt, ties going to whoever hit first, and
/// paid along the board's remaining curve. Ranks past its end get the curve's
/// last value. First blood adds one point on the normal side.
pub fn board_scores(board: &PlayerBoard) -> Vec<(PlayerColor, u32)> {
    // (dealer, tokens, index of first token)
    let mut dealers: Vec<(PlayerColor, usize, usize)> = Vec::new();
    for (index, &dealer) in board.damage().iter().enumerate() {
        match dealers.iter_mut().find(|(color, _, _)| *color == dealer) {
            Some((_, count, _)) => *count += 1,
            None => dealers.push((dealer, 1, index)),
        }
    }
    dealers.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let curve = board.board_points();
    let tail = curve.last().copied().unwrap_or(0);
    let mut scores: Vec<(PlayerColor, u32)> = dealers
        .iter()
        .enumerate()
        .map(|(rank, &(color, _, _))| {
            (color, u32::from(curve.get(rank).copied().unwrap_or(tail)))
        })
        .collect();

    if let Some(first) = board.first_blood()
        && let Some((_, points)) = scores.iter_mut().find(|(color, _)| *color == first)
    {
        *points += 1;
    }
    scores
}

/// Points earned from the kill-shot track.
///
/// Players are ranked by tokens, ties going to whoever placed a token first.
pub fn kill_track_scores(track: &KillShotTrack) -> Vec<(PlayerColor, u32)> {
    kill_track_ranking(track)
        .into_iter()
        .enumerate()
        .map(|(rank, color)| {
            let points = KILL_TRACK_POINTS
                .get(rank)
                .copied()
                .unwrap_or(KILL_TRACK_TAIL);
            (color, u32::from(points))
        })
        .collect()
}

fn kill_track_ranking(track: &KillShotTrack) -> Vec<PlayerColor> {
    let mut totals = track.totals();
    // Stable: equal totals keep first-token order.
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.into_iter().map(|(color, _)| color).collect()
}

/// Final position of one player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Standing {
    pub color: PlayerColor,
    pub nickname: String,
    pub points: u32,
}

/// Orders players by points. Ties go to the better kill-track rank, then to
/// seating order.
pub fn standings(players: &[UserPlayer], track: &KillShotTrack) -> Vec<Standing> {
    let ranking = kill_track_ranking(track);
    let track_rank = |color: PlayerColor| {
        ranking
            .iter()
            .position(|&other| other == color)
            .unwrap_or(usize::MAX)
    };

    let mut seated: Vec<(usize, &UserPlayer)> = players.iter().enumerate().collect();
    seated.sort_by(|(a_seat, a), (b_seat, b)| {
        b.actor
            .points
            .cmp(&a.actor.points)
            .then(track_rank(a.color()).cmp(&track_rank(b.color())))
            .then(a_seat.cmp(b_seat))
    });

    seated
        .into_iter()
        .map(|(_, player)| Standing {
            color: player.color(),
            nickname: player.actor.nickname.clone(),
            points: player.actor.points,
        })
        .collect()
}
