//! Campus structure: the nested tree and per-level CRUD.

use std::fmt::Write;

use tabled::Tabled;

use unigate_api::types::{AccessPointPayload, BuildingPayload, FloorPayload, RoomPayload};
use unigate_core::{
    AccessPoint, Building, CampusController, CampusNodeKind, Floor, Room, ViewState,
};

use crate::cli::{
    AccessPointsArgs, AccessPointsCommand, BuildingsArgs, BuildingsCommand, FloorsArgs,
    FloorsCommand, GlobalOpts, RoomsArgs, RoomsCommand,
};
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BuildingRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Floors")]
    floors: usize,
}

impl From<&Building> for BuildingRow {
    fn from(b: &Building) -> Self {
        Self {
            id: b.id,
            name: b.name.clone(),
            location: b.location.clone().unwrap_or_default(),
            floors: b.floors.len(),
        }
    }
}

#[derive(Tabled)]
struct FloorRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Building")]
    building: i64,
    #[tabled(rename = "Number")]
    number: i32,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Rooms")]
    rooms: usize,
}

impl From<&Floor> for FloorRow {
    fn from(f: &Floor) -> Self {
        Self {
            id: f.id,
            building: f.building_id,
            number: f.number,
            description: f.description.clone().unwrap_or_default(),
            rooms: f.rooms.len(),
        }
    }
}

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Floor")]
    floor: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    room_type: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Access Points")]
    access_points: usize,
}

impl From<&Room> for RoomRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id,
            floor: r.floor_id,
            name: r.name.clone(),
            room_type: r.room_type.as_ref().map(ToString::to_string).unwrap_or_default(),
            capacity: r.capacity.as_ref().map(ToString::to_string).unwrap_or_default(),
            access_points: r.access_points.len(),
        }
    }
}

#[derive(Tabled)]
struct AccessPointRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Room")]
    room: i64,
    #[tabled(rename = "Identifier")]
    identifier: String,
    #[tabled(rename = "Type")]
    kind: String,
}

impl From<&AccessPoint> for AccessPointRow {
    fn from(ap: &AccessPoint) -> Self {
        Self {
            id: ap.id,
            room: ap.room_id,
            identifier: ap.identifier.clone(),
            kind: ap.kind.clone(),
        }
    }
}

// ── Tree ────────────────────────────────────────────────────────────

fn render_tree(buildings: &[Building]) -> String {
    let mut out = String::new();
    for b in buildings {
        let _ = writeln!(out, "🏢 {} [{}]", b.name, b.id);
        for f in &b.floors {
            let _ = writeln!(out, "  ├─ Floor {} [{}]", f.number, f.id);
            for r in &f.rooms {
                let kind = r.room_type.map(|t| format!(" ({t})")).unwrap_or_default();
                let _ = writeln!(out, "  │   ├─ {}{kind} [{}]", r.name, r.id);
                for ap in &r.access_points {
                    let _ = writeln!(out, "  │   │   └─ {} ({}) [{}]", ap.identifier, ap.kind, ap.id);
                }
            }
        }
    }
    out.trim_end().to_owned()
}

pub async fn tree(ctx: &SessionContext, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let controller = CampusController::new(ctx.session.api().clone());
    let campus = util::settle(controller.refresh().await)?;

    let (buildings, floors, rooms, points) = campus.counts();
    let out = output::render_single(
        &global.output,
        &campus.buildings,
        |b| render_tree(b),
        |b| {
            b.iter()
                .map(|b| b.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, global.quiet);
    output::notice(
        &format!("{buildings} buildings, {floors} floors, {rooms} rooms, {points} access points"),
        global.quiet,
    );
    Ok(())
}

// ── Delete (shared) ─────────────────────────────────────────────────

/// Confirm against the node's label, delete it, and report.
async fn delete_node(
    ctx: &SessionContext,
    kind: CampusNodeKind,
    id: i64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let controller = CampusController::new(ctx.session.api().clone());
    if let ViewState::Failed(err) = controller.refresh().await {
        return Err(util::failure(err));
    }
    let label = controller.label_of(kind, id).ok_or_else(|| CliError::NotFound {
        message: format!("{kind} {id}"),
    })?;

    if !util::confirm(&format!("Delete {kind} '{label}' and everything in it?"), global.yes)? {
        return Ok(());
    }
    controller.delete(kind, id).await?;
    output::notice(&format!("✓ Deleted {kind} '{label}'"), global.quiet);
    Ok(())
}

// ── Buildings ───────────────────────────────────────────────────────

pub async fn buildings(
    ctx: &SessionContext,
    args: BuildingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let api = ctx.session.api();

    match args.command {
        BuildingsCommand::List => {
            let all = api.list_buildings().await?;
            let out = output::render_list(&global.output, &all, |b| BuildingRow::from(b), |b| {
                b.id.to_string()
            });
            output::print_output(&out, global.quiet);
        }
        BuildingsCommand::Get { id } => {
            let b = api.get_building(id).await?;
            let out = output::render_single(
                &global.output,
                &b,
                |b| {
                    output::detail(&[
                        ("ID", b.id.to_string()),
                        ("Name", b.name.clone()),
                        ("Description", b.description.clone().unwrap_or_default()),
                        ("Location", b.location.clone().unwrap_or_default()),
                        ("Floors", b.floors.len().to_string()),
                    ])
                },
                |b| b.id.to_string(),
            );
            output::print_output(&out, global.quiet);
        }
        BuildingsCommand::Create {
            name,
            description,
            location,
        } => {
            let payload = BuildingPayload {
                name,
                description: util::non_blank(description),
                location: util::non_blank(location),
            };
            api.create_building(&payload).await?;
            output::notice(&format!("✓ Building '{}' created", payload.name), global.quiet);
        }
        BuildingsCommand::Update {
            id,
            name,
            description,
            location,
        } => {
            let payload = BuildingPayload {
                name,
                description: util::non_blank(description),
                location: util::non_blank(location),
            };
            api.update_building(id, &payload).await?;
            output::notice(&format!("✓ Building {id} updated"), global.quiet);
        }
        BuildingsCommand::Delete { id } => {
            delete_node(ctx, CampusNodeKind::Building, id, global).await?;
        }
    }
    Ok(())
}

// ── Floors ──────────────────────────────────────────────────────────

pub async fn floors(
    ctx: &SessionContext,
    args: FloorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let api = ctx.session.api();

    match args.command {
        FloorsCommand::List => {
            let all = api.list_floors().await?;
            let out = output::render_list(&global.output, &all, |f| FloorRow::from(f), |f| {
                f.id.to_string()
            });
            output::print_output(&out, global.quiet);
        }
        FloorsCommand::Get { id } => {
            let f = api.get_floor(id).await?;
            let out = output::render_single(
                &global.output,
                &f,
                |f| {
                    output::detail(&[
                        ("ID", f.id.to_string()),
                        ("Building", f.building_id.to_string()),
                        ("Number", f.number.to_string()),
                        ("Description", f.description.clone().unwrap_or_default()),
                        ("Rooms", f.rooms.len().to_string()),
                    ])
                },
                |f| f.id.to_string(),
            );
            output::print_output(&out, global.quiet);
        }
        FloorsCommand::Create {
            building,
            number,
            description,
        } => {
            api.create_floor(&FloorPayload {
                building_id: building,
                number,
                description: util::non_blank(description),
            })
            .await?;
            output::notice(
                &format!("✓ Floor {number} created in building {building}"),
                global.quiet,
            );
        }
        FloorsCommand::Update {
            id,
            building,
            number,
            description,
        } => {
            api.update_floor(
                id,
                &FloorPayload {
                    building_id: building,
                    number,
                    description: util::non_blank(description),
                },
            )
            .await?;
            output::notice(&format!("✓ Floor {id} updated"), global.quiet);
        }
        FloorsCommand::Delete { id } => {
            delete_node(ctx, CampusNodeKind::Floor, id, global).await?;
        }
    }
    Ok(())
}

// ── Rooms ───────────────────────────────────────────────────────────

pub async fn rooms(
    ctx: &SessionContext,
    args: RoomsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let api = ctx.session.api();

    match args.command {
        RoomsCommand::List => {
            let all = api.list_rooms().await?;
            let out = output::render_list(&global.output, &all, |r| RoomRow::from(r), |r| {
                r.id.to_string()
            });
            output::print_output(&out, global.quiet);
        }
        RoomsCommand::Get { id } => {
            let r = api.get_room(id).await?;
            let out = output::render_single(
                &global.output,
                &r,
                |r| {
                    output::detail(&[
                        ("ID", r.id.to_string()),
                        ("Floor", r.floor_id.to_string()),
                        ("Name", r.name.clone()),
                        ("Type", r.room_type.as_ref().map(ToString::to_string).unwrap_or_default()),
                        ("Capacity", r.capacity.as_ref().map(ToString::to_string).unwrap_or_default()),
                        ("Description", r.description.clone().unwrap_or_default()),
                        ("Access points", r.access_points.len().to_string()),
                    ])
                },
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
        }
        RoomsCommand::Create {
            floor,
            name,
            room_type,
            capacity,
            description,
        } => {
            let payload = RoomPayload {
                floor_id: floor,
                name,
                description: util::non_blank(description),
                room_type,
                capacity,
            };
            api.create_room(&payload).await?;
            output::notice(&format!("✓ Room '{}' created", payload.name), global.quiet);
        }
        RoomsCommand::Update {
            id,
            floor,
            name,
            room_type,
            capacity,
            description,
        } => {
            api.update_room(
                id,
                &RoomPayload {
                    floor_id: floor,
                    name,
                    description: util::non_blank(description),
                    room_type,
                    capacity,
                },
            )
            .await?;
            output::notice(&format!("✓ Room {id} updated"), global.quiet);
        }
        RoomsCommand::Delete { id } => {
            delete_node(ctx, CampusNodeKind::Room, id, global).await?;
        }
    }
    Ok(())
}

// ── Access points ───────────────────────────────────────────────────

pub async fn access_points(
    ctx: &SessionContext,
    args: AccessPointsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let api = ctx.session.api();

    match args.command {
        AccessPointsCommand::List => {
            let all = api.list_access_points().await?;
            let out = output::render_list(
                &global.output,
                &all,
                |ap| AccessPointRow::from(ap),
                |ap| ap.id.to_string(),
            );
            output::print_output(&out, global.quiet);
        }
        AccessPointsCommand::Get { id } => {
            let ap = api.get_access_point(id).await?;
            let out = output::render_single(
                &global.output,
                &ap,
                |ap| {
                    output::detail(&[
                        ("ID", ap.id.to_string()),
                        ("Room", ap.room_id.to_string()),
                        ("Identifier", ap.identifier.clone()),
                        ("Type", ap.kind.clone()),
                    ])
                },
                |ap| ap.id.to_string(),
            );
            output::print_output(&out, global.quiet);
        }
        AccessPointsCommand::Create {
            room,
            identifier,
            kind,
        } => {
            let payload = AccessPointPayload {
                room_id: room,
                identifier,
                kind,
            };
            api.create_access_point(&payload).await?;
            output::notice(
                &format!("✓ Access point '{}' created", payload.identifier),
                global.quiet,
            );
        }
        AccessPointsCommand::Update {
            id,
            room,
            identifier,
            kind,
        } => {
            api.update_access_point(
                id,
                &AccessPointPayload {
                    room_id: room,
                    identifier,
                    kind,
                },
            )
            .await?;
            output::notice(&format!("✓ Access point {id} updated"), global.quiet);
        }
        AccessPointsCommand::Delete { id } => {
            delete_node(ctx, CampusNodeKind::AccessPoint, id, global).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tree_nests_every_level() {
        let building: Building = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Main",
            "floors": [{ "id": 10, "number": 2, "buildingId": 1,
                "rooms": [{ "id": 100, "name": "Lab A", "type": "Laboratory", "floorId": 10,
                    "accessPoints": [{ "id": 7, "type": "QR", "identifier": "AP-7", "roomId": 100 }]
                }]
            }]
        }))
        .unwrap();

        let out = render_tree(&[building]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Main [1]"));
        assert!(lines[1].contains("Floor 2 [10]"));
        assert!(lines[2].contains("Lab A (Laboratory) [100]"));
        assert!(lines[3].contains("AP-7 (QR) [7]"));
    }
}
