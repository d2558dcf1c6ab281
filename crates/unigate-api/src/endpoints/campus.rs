// Campus structure endpoints: buildings, floors, rooms, access points
//
// `GET building` returns the full nested tree; the per-kind list calls
// return flat collections.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{
    AccessPointDto, AccessPointPayload, BuildingDto, BuildingPayload, FloorDto, FloorPayload,
    RoomDto, RoomPayload,
};

impl ApiClient {
    // ── Buildings ───────────────────────────────────────────────────

    /// Buildings with their floors, rooms and access points nested.
    pub async fn list_buildings(&self) -> Result<Vec<BuildingDto>, Error> {
        self.get("building").await
    }

    pub async fn get_building(&self, id: i64) -> Result<BuildingDto, Error> {
        self.get(&format!("building/{id}")).await
    }

    pub async fn create_building(&self, payload: &BuildingPayload) -> Result<(), Error> {
        self.post_no_response("building", payload).await
    }

    pub async fn update_building(&self, id: i64, payload: &BuildingPayload) -> Result<(), Error> {
        self.put_no_response(&format!("building/{id}"), payload)
            .await
    }

    pub async fn delete_building(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("building/{id}")).await
    }

    // ── Floors ──────────────────────────────────────────────────────

    pub async fn list_floors(&self) -> Result<Vec<FloorDto>, Error> {
        self.get("floor").await
    }

    pub async fn get_floor(&self, id: i64) -> Result<FloorDto, Error> {
        self.get(&format!("floor/{id}")).await
    }

    pub async fn create_floor(&self, payload: &FloorPayload) -> Result<(), Error> {
        self.post_no_response("floor", payload).await
    }

    pub async fn update_floor(&self, id: i64, payload: &FloorPayload) -> Result<(), Error> {
        self.put_no_response(&format!("floor/{id}"), payload).await
    }

    pub async fn delete_floor(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("floor/{id}")).await
    }

    // ── Rooms ───────────────────────────────────────────────────────

    pub async fn list_rooms(&self) -> Result<Vec<RoomDto>, Error> {
        self.get("room").await
    }

    pub async fn get_room(&self, id: i64) -> Result<RoomDto, Error> {
        self.get(&format!("room/{id}")).await
    }

    pub async fn create_room(&self, payload: &RoomPayload) -> Result<(), Error> {
        self.post_no_response("room", payload).await
    }

    pub async fn update_room(&self, id: i64, payload: &RoomPayload) -> Result<(), Error> {
        self.put_no_response(&format!("room/{id}"), payload).await
    }

    pub async fn delete_room(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("room/{id}")).await
    }

    // ── Access points ───────────────────────────────────────────────

    pub async fn list_access_points(&self) -> Result<Vec<AccessPointDto>, Error> {
        self.get("accesspoint").await
    }

    pub async fn get_access_point(&self, id: i64) -> Result<AccessPointDto, Error> {
        self.get(&format!("accesspoint/{id}")).await
    }

    pub async fn create_access_point(&self, payload: &AccessPointPayload) -> Result<(), Error> {
        self.post_no_response("accesspoint", payload).await
    }

    pub async fn update_access_point(
        &self,
        id: i64,
        payload: &AccessPointPayload,
    ) -> Result<(), Error> {
        self.put_no_response(&format!("accesspoint/{id}"), payload)
            .await
    }

    pub async fn delete_access_point(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("accesspoint/{id}")).await
    }
}
