//! In-memory repositories for service tests
//!
//! One mutex guards all state, so every repository call is atomic the way a
//! Postgres transaction holding the club row lock is.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use club_common::auth::JwtService;
use club_core::entities::{Club, ClubMembership, MembershipChange, MembershipRole, User};
use club_core::traits::{ClubQuery, ClubRepository, MembershipRepository, RepoResult, UserRepository};
use club_core::{plan_leave, DomainError, LeaveOutcome, LeavePlan, LeaveRequest, Snowflake, SnowflakeGenerator};
use tokio::sync::Mutex;

use super::context::{ServiceContext, ServiceContextBuilder};

const TEST_SECRET: &str = "test-secret-key-that-is-at-least-32-characters-long";

/// Build a service context backed by a fresh [`MemoryStore`]
pub(crate) fn test_context() -> (ServiceContext, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let ctx = ServiceContextBuilder::default()
        .user_repo(store.clone())
        .club_repo(store.clone())
        .membership_repo(store.clone())
        .user_cache(None)
        .jwt_service(Arc::new(JwtService::new(TEST_SECRET, 900, 604_800)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .build()
        .unwrap();
    (ctx, store)
}

struct StoredClub {
    club: Club,
    deleted: bool,
}

#[derive(Default)]
struct State {
    users: Vec<(User, String)>,
    clubs: Vec<StoredClub>,
    memberships: Vec<ClubMembership>,
}

impl State {
    fn live_club(&mut self, club_id: Snowflake) -> RepoResult<&mut Club> {
        self.clubs
            .iter_mut()
            .find(|c| c.club.id == club_id && !c.deleted)
            .map(|c| &mut c.club)
            .ok_or(DomainError::ClubNotFound(club_id))
    }

    fn membership_index(&self, club_id: Snowflake, user_id: Snowflake) -> Option<usize> {
        self.memberships
            .iter()
            .position(|m| m.club_id == club_id && m.user_id == user_id)
    }

    fn name_taken(&self, name: &str, except: Snowflake) -> bool {
        self.clubs.iter().any(|c| {
            !c.deleted && c.club.id != except && c.club.name.to_lowercase() == name.to_lowercase()
        })
    }

    fn recount(&mut self, club_id: Snowflake) -> i32 {
        let count = self
            .memberships
            .iter()
            .filter(|m| m.club_id == club_id)
            .count() as i32;
        if let Some(stored) = self.clubs.iter_mut().find(|c| c.club.id == club_id) {
            stored.club.members_count = count;
        }
        count
    }

    fn apply(&mut self, plan: LeavePlan) -> LeaveOutcome {
        match plan {
            LeavePlan::RemoveMember { club_id, user_id } => {
                self.memberships
                    .retain(|m| !(m.club_id == club_id && m.user_id == user_id));
                let count = self.recount(club_id);
                plan.into_outcome(count)
            }
            LeavePlan::Transfer {
                club_id,
                previous_owner_id,
                new_owner_id,
            } => {
                if let Ok(club) = self.live_club(club_id) {
                    club.transfer_ownership(new_owner_id);
                }
                self.memberships
                    .retain(|m| !(m.club_id == club_id && m.user_id == previous_owner_id));
                let count = self.recount(club_id);
                plan.into_outcome(count)
            }
            LeavePlan::Close { club_id } => {
                self.close(club_id);
                plan.into_outcome(0)
            }
        }
    }

    fn close(&mut self, club_id: Snowflake) {
        self.memberships.retain(|m| m.club_id != club_id);
        if let Some(stored) = self.clubs.iter_mut().find(|c| c.club.id == club_id) {
            stored.deleted = true;
            stored.club.members_count = 0;
        }
    }
}

/// Users, clubs, and memberships held in memory
pub(crate) struct MemoryStore {
    state: Mutex<State>,
    next_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            state: Mutex::new(State::default()),
            next_id: AtomicI64::new(10_000),
        }
    }
}

impl MemoryStore {
    fn next_id(&self) -> Snowflake {
        Snowflake::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) async fn add_user(&self, username: &str) -> User {
        let user = User::new(self.next_id(), username.to_string(), format!("{username}@example.com"));
        UserRepository::create(self, &user, "not-a-real-hash").await.unwrap();
        user
    }

    pub(crate) async fn add_club(&self, name: &str, owner_id: Snowflake, is_private: bool) -> Club {
        let mut club = Club::new(self.next_id(), name.to_string(), owner_id);
        club.is_private = is_private;
        let founder = ClubMembership::founder(self.next_id(), club.id, owner_id);
        ClubRepository::create(self, &club, &founder).await.unwrap();
        ClubRepository::find_by_id(self, club.id).await.unwrap().unwrap()
    }

    pub(crate) async fn add_member(&self, club_id: Snowflake, user_id: Snowflake, approved: bool) {
        let membership = ClubMembership::new(
            self.next_id(),
            club_id,
            user_id,
            MembershipRole::Member,
            approved,
        );
        let mut state = self.state.lock().await;
        state.memberships.push(membership);
        state.recount(club_id);
    }

    pub(crate) async fn memberships_of(&self, club_id: Snowflake) -> Vec<ClubMembership> {
        let state = self.state.lock().await;
        state
            .memberships
            .iter()
            .filter(|m| m.club_id == club_id)
            .cloned()
            .collect()
    }

    /// Stored `members_count`, closed clubs included
    pub(crate) async fn members_count(&self, club_id: Snowflake) -> i32 {
        let state = self.state.lock().await;
        state
            .clubs
            .iter()
            .find(|c| c.club.id == club_id)
            .map_or(0, |c| c.club.members_count)
    }

    pub(crate) async fn owner_of(&self, club_id: Snowflake) -> Option<Snowflake> {
        let state = self.state.lock().await;
        state
            .clubs
            .iter()
            .find(|c| c.club.id == club_id)
            .and_then(|c| c.club.owner_id)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.email.eq_ignore_ascii_case(email))
            .map(|(u, _)| u.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .any(|(u, _)| u.username.eq_ignore_ascii_case(username)))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|(u, _)| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if state
            .users
            .iter()
            .any(|(u, _)| u.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(DomainError::UsernameTaken);
        }
        state.users.push((user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        let (stored, _) = state
            .users
            .iter_mut()
            .find(|(u, _)| u.id == user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        stored.display_name.clone_from(&user.display_name);
        stored.bio.clone_from(&user.bio);
        stored.avatar_url.clone_from(&user.avatar_url);
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(_, hash)| hash.clone()))
    }
}

#[async_trait]
impl ClubRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Club>> {
        let mut state = self.state.lock().await;
        Ok(state.live_club(id).ok().cloned())
    }

    async fn list(&self, query: &ClubQuery) -> RepoResult<Vec<Club>> {
        let state = self.state.lock().await;
        let genre = query.genre.as_deref().map(str::to_lowercase);
        let location = query.location.as_deref().map(str::to_lowercase);

        Ok(state
            .clubs
            .iter()
            .rev()
            .filter(|c| !c.deleted && !c.club.is_private)
            .map(|c| &c.club)
            .filter(|c| {
                genre.as_ref().map_or(true, |g| {
                    c.genre.as_deref().is_some_and(|cg| cg.to_lowercase() == *g)
                })
            })
            .filter(|c| {
                location.as_ref().map_or(true, |l| {
                    c.location
                        .as_deref()
                        .is_some_and(|cl| cl.to_lowercase().contains(l.as_str()))
                })
            })
            .skip(query.offset.max(0) as usize)
            .take(query.limit.clamp(1, 100) as usize)
            .cloned()
            .collect())
    }

    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Club>> {
        let state = self.state.lock().await;
        Ok(state
            .clubs
            .iter()
            .filter(|c| !c.deleted)
            .filter(|c| {
                state
                    .memberships
                    .iter()
                    .any(|m| m.club_id == c.club.id && m.user_id == user_id)
            })
            .map(|c| c.club.clone())
            .collect())
    }

    async fn create(&self, club: &Club, founder: &ClubMembership) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        if state.name_taken(&club.name, club.id) {
            return Err(DomainError::ClubNameTaken);
        }
        let mut club = club.clone();
        club.members_count = 0;
        state.clubs.push(StoredClub {
            club,
            deleted: false,
        });
        state.memberships.push(founder.clone());
        state.recount(founder.club_id);
        Ok(())
    }

    async fn update(&self, club: &Club, actor_id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        state.live_club(club.id)?.ensure_owner(actor_id)?;
        if state.name_taken(&club.name, club.id) {
            return Err(DomainError::ClubNameTaken);
        }
        let stored = state.live_club(club.id)?;
        stored.name.clone_from(&club.name);
        stored.description.clone_from(&club.description);
        stored.location.clone_from(&club.location);
        stored.genre.clone_from(&club.genre);
        stored.is_private = club.is_private;
        stored.max_members = club.max_members;
        stored.tags.clone_from(&club.tags);
        stored.current_book.clone_from(&club.current_book);
        stored.next_meeting.clone_from(&club.next_meeting);
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Snowflake, actor_id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        state.live_club(id)?.ensure_owner(actor_id)?;
        state.close(id);
        Ok(())
    }

    async fn leave(&self, request: &LeaveRequest) -> RepoResult<LeaveOutcome> {
        let mut state = self.state.lock().await;
        let club = state.live_club(request.club_id)?.clone();
        let members: Vec<ClubMembership> = state
            .memberships
            .iter()
            .filter(|m| m.club_id == club.id)
            .cloned()
            .collect();

        let plan = plan_leave(&club, &members, request)?;
        Ok(state.apply(plan))
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find(
        &self,
        club_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ClubMembership>> {
        let state = self.state.lock().await;
        Ok(state
            .membership_index(club_id, user_id)
            .map(|i| state.memberships[i].clone()))
    }

    async fn find_by_club(&self, club_id: Snowflake) -> RepoResult<Vec<ClubMembership>> {
        Ok(self.memberships_of(club_id).await)
    }

    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ClubMembership>> {
        let state = self.state.lock().await;
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn join(&self, membership: &ClubMembership) -> RepoResult<i32> {
        let mut state = self.state.lock().await;
        let is_full = state.live_club(membership.club_id)?.is_full();
        if state
            .membership_index(membership.club_id, membership.user_id)
            .is_some()
        {
            return Err(DomainError::AlreadyMember);
        }
        if is_full {
            return Err(DomainError::ClubFull);
        }
        state.memberships.push(membership.clone());
        Ok(state.recount(membership.club_id))
    }

    async fn update(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        user_id: Snowflake,
        change: MembershipChange,
    ) -> RepoResult<ClubMembership> {
        let mut state = self.state.lock().await;
        state.live_club(club_id)?.ensure_owner(actor_id)?;
        let index = state
            .membership_index(club_id, user_id)
            .ok_or(DomainError::MembershipNotFound)?;
        let membership = &mut state.memberships[index];
        change.apply(membership);
        Ok(membership.clone())
    }

    async fn delete(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        let club = state.live_club(club_id)?;
        club.ensure_owner(actor_id)?;
        if club.is_owner(user_id) {
            return Err(DomainError::CannotKickOwner);
        }
        let index = state
            .membership_index(club_id, user_id)
            .ok_or(DomainError::MembershipNotFound)?;
        state.memberships.remove(index);
        state.recount(club_id);
        Ok(())
    }
}
