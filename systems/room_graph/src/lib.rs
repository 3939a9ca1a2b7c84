#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Room growth system that attaches rectangular branches to a root room.
//!
//! Growth walks an explicit stack of frontier rooms. Each iteration tries to
//! attach a new room to the room on top of the stack; when every attempt
//! collides the stack is unwound one level and the parent gets another
//! chance. A deadlock at the root ends growth early.

use delve_core::{Room, RoomSide, Settings, HALLWAY_GAP};
use rand::Rng;
use tracing::{debug, info};

/// Number of candidate placements tried at one frontier room before it is
/// considered deadlocked.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;

/// Tree edge recorded when a branch room is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoomLink {
    /// Index of the room the branch grew from.
    pub parent: usize,
    /// Index of the newly attached room.
    pub child: usize,
    /// Side of the parent the child was attached to.
    pub side: RoomSide,
}

/// Ordered room sequence produced by growth together with its tree edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    links: Vec<RoomLink>,
}

impl RoomGraph {
    /// Rooms in creation order; the root is always first.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Tree edges in the order the branches were attached.
    #[must_use]
    pub fn links(&self) -> &[RoomLink] {
        &self.links
    }

    /// Number of branch rooms placed, excluding the root.
    #[must_use]
    pub fn branch_count(&self) -> u32 {
        u32::try_from(self.links.len()).unwrap_or(u32::MAX)
    }

    /// Splits the graph into its room sequence and tree edges.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Room>, Vec<RoomLink>) {
        (self.rooms, self.links)
    }
}

#[derive(Clone, Copy, Debug)]
struct Frontier {
    index: usize,
    forbidden: Option<RoomSide>,
}

/// Pure system that grows a room tree from validated settings.
#[derive(Debug, Default)]
pub struct RoomGraphBuilder;

impl RoomGraphBuilder {
    /// Creates a new room graph builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Grows up to `settings.room_count()` branch rooms around a root placed at
    /// the origin.
    ///
    /// Random draws happen in a fixed order: root width and height, then per
    /// attempt the side, width, height and slide of the candidate.
    pub fn grow<R: Rng + ?Sized>(&self, settings: &Settings, rng: &mut R) -> RoomGraph {
        let root = Room::new(0, 0, draw_size(settings, rng), draw_size(settings, rng));
        let mut growth = Growth::new(root);
        let _ = growth.run(settings, settings.room_count(), rng);
        growth.into_graph()
    }
}

/// Mutable growth state: the append-only room sequence, its tree edges and
/// the frontier stack of rooms still allowed to branch.
#[derive(Clone, Debug)]
struct Growth {
    rooms: Vec<Room>,
    links: Vec<RoomLink>,
    stack: Vec<Frontier>,
}

impl Growth {
    fn new(root: Room) -> Self {
        Self {
            rooms: vec![root],
            links: Vec::new(),
            stack: vec![Frontier {
                index: 0,
                forbidden: None,
            }],
        }
    }

    fn into_graph(self) -> RoomGraph {
        RoomGraph {
            rooms: self.rooms,
            links: self.links,
        }
    }

    /// Attaches up to `count` branch rooms and returns how many were placed.
    fn run<R: Rng + ?Sized>(&mut self, settings: &Settings, count: u32, rng: &mut R) -> u32 {
        let mut placed = 0;
        while placed < count {
            let Some(frontier) = self.stack.last().copied() else {
                break;
            };

            if let Some((room, side)) = attach_branch(&self.rooms, frontier, settings, rng) {
                let child = self.rooms.len();
                self.rooms.push(room);
                self.links.push(RoomLink {
                    parent: frontier.index,
                    child,
                    side,
                });
                self.stack.push(Frontier {
                    index: child,
                    forbidden: Some(side.opposite()),
                });
                placed += 1;
                continue;
            }

            if !self.unwind() {
                info!(
                    requested = count,
                    generated = placed,
                    "room growth deadlocked at the root"
                );
                break;
            }
        }
        placed
    }

    /// Drops the deadlocked frontier room and lets its parent branch in any
    /// direction. Returns `false` when the deadlocked room is the root.
    fn unwind(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        let Some(deadlocked) = self.stack.pop() else {
            return false;
        };
        if let Some(parent) = self.stack.last_mut() {
            parent.forbidden = None;
            debug!(
                deadlocked = deadlocked.index,
                parent = parent.index,
                "room growth backtracked"
            );
        }
        true
    }
}

fn attach_branch<R: Rng + ?Sized>(
    rooms: &[Room],
    frontier: Frontier,
    settings: &Settings,
    rng: &mut R,
) -> Option<(Room, RoomSide)> {
    let current = rooms[frontier.index];
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let side = pick_side(frontier.forbidden, rng);
        let width = draw_size(settings, rng);
        let height = draw_size(settings, rng);
        let candidate = place(&current, side, width, height, settings.hall_width(), rng);
        if !rooms.iter().any(|room| candidate.intersects_padded(room)) {
            return Some((candidate, side));
        }
    }
    None
}

fn pick_side<R: Rng + ?Sized>(forbidden: Option<RoomSide>, rng: &mut R) -> RoomSide {
    let mut sides = RoomSide::ALL;
    let mut len = 0;
    for side in RoomSide::ALL {
        if Some(side) != forbidden {
            sides[len] = side;
            len += 1;
        }
    }
    sides[rng.gen_range(0..len)]
}

fn draw_size<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> u32 {
    rng.gen_range(settings.room_min_size()..=settings.room_max_size())
}

/// Positions a candidate so its near edge sits `HALLWAY_GAP` cells beyond the
/// current room and its perpendicular extent overlaps by at least `hall_width`.
fn place<R: Rng + ?Sized>(
    current: &Room,
    side: RoomSide,
    width: u32,
    height: u32,
    hall_width: u32,
    rng: &mut R,
) -> Room {
    let (w, h, hw) = (width as i32, height as i32, hall_width as i32);
    match side {
        RoomSide::Right | RoomSide::Left => {
            let y = rng.gen_range(current.top() - h + hw..=current.bottom() - hw + 1);
            let x = if side == RoomSide::Right {
                current.right() + HALLWAY_GAP
            } else {
                current.left() - HALLWAY_GAP - w + 1
            };
            Room::new(x, y, width, height)
        }
        RoomSide::Top | RoomSide::Bottom => {
            let x = rng.gen_range(current.left() - w + hw..=current.right() - hw + 1);
            let y = if side == RoomSide::Bottom {
                current.bottom() + HALLWAY_GAP
            } else {
                current.top() - HALLWAY_GAP - h + 1
            };
            Room::new(x, y, width, height)
        }
    }
}
