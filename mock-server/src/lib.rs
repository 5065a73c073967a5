//! In-memory stand-in for the Twitter v2 Lists API and the OAuth2 app-only
//! token endpoints, seeded with a handful of users, lists and tweets.
//!
//! Any non-empty bearer token is accepted for reads. Writes reject tokens
//! issued by `/oauth2/token` and act as `AUTHENTICATED_USER_ID`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CONSUMER_KEY: &str = "mock-consumer-key";
pub const CONSUMER_SECRET: &str = "mock-consumer-secret";
/// The account every user-context token acts for.
pub const AUTHENTICATED_USER_ID: &str = "783214";
pub const OFFICIAL_LIST_ID: &str = "84839422";

const NOT_FOUND_TYPE: &str = "https://api.twitter.com/2/problems/resource-not-found";
const INVALID_REQUEST_TYPE: &str = "https://api.twitter.com/2/problems/invalid-request";
const UNSUPPORTED_AUTH_TYPE: &str = "https://api.twitter.com/2/problems/unsupported-authentication";
const DEFAULT_MAX_RESULTS: usize = 100;

#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub created_at: String,
}

#[derive(Clone, Debug)]
pub struct ListRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub private: bool,
    pub owner_id: String,
    pub created_at: String,
    pub members: Vec<String>,
    pub followers: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub created_at: String,
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: BTreeMap<String, User>,
    pub lists: BTreeMap<String, ListRecord>,
    pub tweets: Vec<Tweet>,
    pub pinned: HashMap<String, Vec<String>>,
    app_tokens: HashSet<String>,
    next_list_id: u64,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
struct UserIdBody {
    user_id: String,
}

#[derive(Deserialize)]
struct ListIdBody {
    list_id: String,
}

#[derive(Deserialize)]
struct CreateList {
    name: String,
    description: Option<String>,
    #[serde(default)]
    private: bool,
}

#[derive(Deserialize)]
struct UpdateList {
    name: Option<String>,
    description: Option<String>,
    private: Option<bool>,
}

/// An error response in one of the API's three error shapes.
#[derive(Debug)]
struct Failure {
    status: StatusCode,
    body: Value,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult = Result<Json<Value>, Failure>;

impl Failure {
    fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: json!({"errors": [{
                "value": id,
                "detail": format!("Could not find {resource_type} with id: [{id}]."),
                "title": "Not Found Error",
                "resource_type": resource_type,
                "parameter": "id",
                "resource_id": id,
                "type": NOT_FOUND_TYPE,
            }]}),
        }
    }

    fn invalid(parameter: &str, value: &str, message: String) -> Self {
        let mut parameters = Map::new();
        parameters.insert(parameter.to_string(), json!([value]));
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({
                "errors": [{"parameters": parameters, "message": message}],
                "title": "Invalid Request",
                "detail": "One or more parameters to your request was invalid.",
                "type": INVALID_REQUEST_TYPE,
            }),
        }
    }

    fn problem(status: StatusCode, title: &str, detail: &str, kind: &str) -> Self {
        Self {
            status,
            body: json!({"title": title, "detail": detail, "type": kind, "status": status.as_u16()}),
        }
    }

    fn unauthorized() -> Self {
        Self::problem(StatusCode::UNAUTHORIZED, "Unauthorized", "Unauthorized", "about:blank")
    }

    fn forbidden(detail: &str) -> Self {
        Self::problem(StatusCode::FORBIDDEN, "Forbidden", detail, "about:blank")
    }

    fn oauth(status: StatusCode, code: i64, message: &str, label: Option<&str>) -> Self {
        let mut item = Map::new();
        item.insert("code".to_string(), json!(code));
        item.insert("message".to_string(), json!(message));
        if let Some(label) = label {
            item.insert("label".to_string(), json!(label));
        }
        Self {
            status,
            body: json!({"errors": [item]}),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    AppOrUser,
    UserOnly,
}

fn authorize(store: &Store, headers: &HeaderMap, access: Access) -> Result<(), Failure> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(Failure::unauthorized)?;
    if access == Access::UserOnly && store.app_tokens.contains(token) {
        return Err(Failure::problem(
            StatusCode::FORBIDDEN,
            "Unsupported Authentication",
            "Authenticating with OAuth 2.0 Application-Only is forbidden for this endpoint.",
            UNSUPPORTED_AUTH_TYPE,
        ));
    }
    Ok(())
}

fn consumer_authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(|encoded| STANDARD.decode(encoded).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .is_some_and(|creds| creds == format!("{CONSUMER_KEY}:{CONSUMER_SECRET}"))
}

fn numeric_id(value: &str) -> Result<&str, Failure> {
    if value.is_empty() || value.len() > 19 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Failure::invalid(
            "id",
            value,
            format!("The `id` query parameter value [{value}] is not valid"),
        ));
    }
    Ok(value)
}

fn acting_as(user_id: &str) -> Result<(), Failure> {
    if user_id != AUTHENTICATED_USER_ID {
        return Err(Failure::forbidden("You are not permitted to perform this action."));
    }
    Ok(())
}

fn owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn requested<'a>(params: &'a HashMap<String, String>, key: &str) -> Vec<&'a str> {
    params
        .get(key)
        .map(|v| v.split(',').filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Slice `items` per `max_results` and the offset carried in
/// `pagination_token`, returning the page and its `meta`.
fn paginate<T: Clone>(items: &[T], params: &HashMap<String, String>) -> Result<(Vec<T>, Value), Failure> {
    let max = match params.get("max_results") {
        None => DEFAULT_MAX_RESULTS,
        Some(raw) => raw.parse::<usize>().ok().filter(|n| (1..=100).contains(n)).ok_or_else(|| {
            Failure::invalid(
                "max_results",
                raw,
                format!("The `max_results` query parameter value [{raw}] is not between 1 and 100"),
            )
        })?,
    };
    let offset = match params.get("pagination_token") {
        None => 0,
        Some(raw) => raw.parse::<usize>().ok().filter(|n| *n <= items.len()).ok_or_else(|| {
            Failure::invalid(
                "pagination_token",
                raw,
                format!("The `pagination_token` query parameter value [{raw}] is not valid"),
            )
        })?,
    };
    let end = (offset + max).min(items.len());
    let page = items[offset..end].to_vec();

    let mut meta = Map::new();
    meta.insert("result_count".to_string(), json!(page.len()));
    if end < items.len() {
        meta.insert("next_token".to_string(), json!(end.to_string()));
    }
    if offset > 0 {
        meta.insert("previous_token".to_string(), json!(offset.saturating_sub(max).to_string()));
    }
    Ok((page, Value::Object(meta)))
}

/// `{data, includes, meta}` with `data` omitted on an empty page and
/// `includes` omitted when nothing was expanded.
fn page_body(data: Vec<Value>, includes: Vec<Value>, meta: Value) -> Json<Value> {
    let mut body = Map::new();
    if !data.is_empty() {
        body.insert("data".to_string(), Value::Array(data));
    }
    if !includes.is_empty() {
        body.insert("includes".to_string(), json!({ "users": includes }));
    }
    body.insert("meta".to_string(), meta);
    Json(Value::Object(body))
}

impl User {
    fn render(&self, fields: &[&str]) -> Value {
        let mut obj = Map::new();
        obj.insert("id".to_string(), json!(self.id));
        obj.insert("name".to_string(), json!(self.name));
        obj.insert("username".to_string(), json!(self.username));
        if fields.contains(&"created_at") {
            obj.insert("created_at".to_string(), json!(self.created_at));
        }
        Value::Object(obj)
    }
}

impl ListRecord {
    fn render(&self, fields: &[&str]) -> Value {
        let mut obj = Map::new();
        obj.insert("id".to_string(), json!(self.id));
        obj.insert("name".to_string(), json!(self.name));
        for field in fields {
            let value = match *field {
                "created_at" => json!(self.created_at),
                "description" => match &self.description {
                    Some(d) => json!(d),
                    None => continue,
                },
                "follower_count" => json!(self.followers.len()),
                "member_count" => json!(self.members.len()),
                "owner_id" => json!(self.owner_id),
                "private" => json!(self.private),
                _ => continue,
            };
            obj.insert(field.to_string(), value);
        }
        Value::Object(obj)
    }
}

impl Tweet {
    fn render(&self, fields: &[&str]) -> Value {
        let mut obj = Map::new();
        obj.insert("id".to_string(), json!(self.id));
        obj.insert("text".to_string(), json!(self.text));
        if fields.contains(&"author_id") {
            obj.insert("author_id".to_string(), json!(self.author_id));
        }
        if fields.contains(&"created_at") {
            obj.insert("created_at".to_string(), json!(self.created_at));
        }
        Value::Object(obj)
    }
}

impl Store {
    pub fn seeded() -> Self {
        let mut store = Store {
            next_list_id: 1_500_000_000_000_000_000,
            ..Default::default()
        };
        let users = [
            ("783214", "Twitter", "Twitter", "2007-02-20T14:35:54.000Z"),
            ("2244994945", "Twitter Dev", "TwitterDev", "2013-12-14T04:35:55.000Z"),
            ("6253282", "Twitter API", "TwitterAPI", "2007-05-23T06:01:13.000Z"),
            ("1319036828964454402", "Birdwatch", "birdwatch", "2020-10-21T22:39:01.000Z"),
            ("1244731491088809984", "Twitter Thailand", "TwitterThailand", "2020-03-30T21:12:21.000Z"),
            ("1194267639100723200", "Twitter Retweets", "TwitterRetweets", "2019-11-12T15:02:31.000Z"),
            ("1168976680867762177", "Twitter Able", "TwitterAble", "2019-09-03T19:04:45.000Z"),
            ("1065249714214457345", "Spaces", "TwitterSpaces", "2018-11-21T13:19:47.000Z"),
            ("1227213680120479745", "구돆", "Follow__Y0U", "2020-02-11T12:52:11.000Z"),
        ];
        for (id, name, username, created_at) in users {
            store.users.insert(
                id.to_string(),
                User {
                    id: id.to_string(),
                    name: name.to_string(),
                    username: username.to_string(),
                    created_at: created_at.to_string(),
                },
            );
        }

        store.insert_list(ListRecord {
            id: OFFICIAL_LIST_ID.to_string(),
            name: "Official Twitter Accounts".to_string(),
            description: Some("Accounts run by Twitter".to_string()),
            private: false,
            owner_id: AUTHENTICATED_USER_ID.to_string(),
            created_at: "2013-03-04T19:12:35.000Z".to_string(),
            members: owned(&[
                "1319036828964454402",
                "1244731491088809984",
                "1194267639100723200",
                "1168976680867762177",
                "1065249714214457345",
                "2244994945",
                "6253282",
            ]),
            followers: owned(&["2244994945", "6253282"]),
        });
        store.insert_list(ListRecord {
            id: "1451951974291689472".to_string(),
            name: "Twitter".to_string(),
            description: None,
            private: false,
            owner_id: "1227213680120479745".to_string(),
            created_at: "2021-10-23T16:49:01.000Z".to_string(),
            members: owned(&["783214", "2244994945"]),
            followers: owned(&["783214", "2244994945", "6253282", "1319036828964454402", "1065249714214457345"]),
        });

        let tweets = [
            ("1458172421115101189", "Introducing Lists endpoints in the Twitter API v2", "2244994945", "2021-11-09T20:46:01.000Z"),
            ("1458150283130871812", "Lists lookup, members and follows are live", "6253282", "2021-11-09T19:18:03.000Z"),
            ("1453442395212582917", "Notes on misleading posts", "1319036828964454402", "2021-10-27T19:30:02.000Z"),
        ];
        for (id, text, author_id, created_at) in tweets {
            store.tweets.push(Tweet {
                id: id.to_string(),
                text: text.to_string(),
                author_id: author_id.to_string(),
                created_at: created_at.to_string(),
            });
        }
        store
    }

    fn insert_list(&mut self, list: ListRecord) {
        self.lists.insert(list.id.clone(), list);
    }

    fn user(&self, id: &str) -> Result<&User, Failure> {
        self.users.get(id).ok_or_else(|| Failure::not_found("user", id))
    }

    fn list(&self, id: &str) -> Result<&ListRecord, Failure> {
        self.lists.get(id).ok_or_else(|| Failure::not_found("list", id))
    }

    fn owned_list_mut(&mut self, id: &str, action: &str) -> Result<&mut ListRecord, Failure> {
        let list = self.lists.get_mut(id).ok_or_else(|| Failure::not_found("list", id))?;
        if list.owner_id != AUTHENTICATED_USER_ID {
            return Err(Failure::forbidden(&format!("You are not allowed to {action} this List.")));
        }
        Ok(list)
    }

    fn expanded_users(&self, ids: impl IntoIterator<Item = String>, params: &HashMap<String, String>) -> Vec<Value> {
        let fields = requested(params, "user.fields");
        let mut seen = Vec::new();
        for id in ids {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen.iter()
            .filter_map(|id| self.users.get(id))
            .map(|u| u.render(&fields))
            .collect()
    }

    fn lists_page(&self, lists: Vec<&ListRecord>, params: &HashMap<String, String>) -> ApiResult {
        let (page, meta) = paginate(&lists, params)?;
        let fields = requested(params, "list.fields");
        let includes = if requested(params, "expansions").contains(&"owner_id") {
            self.expanded_users(page.iter().map(|l| l.owner_id.clone()), params)
        } else {
            Vec::new()
        };
        Ok(page_body(page.iter().map(|l| l.render(&fields)).collect(), includes, meta))
    }

    fn users_page(&self, ids: &[String], params: &HashMap<String, String>) -> ApiResult {
        let users: Vec<&User> = ids.iter().filter_map(|id| self.users.get(id)).collect();
        let (page, meta) = paginate(&users, params)?;
        let fields = requested(params, "user.fields");
        Ok(page_body(page.iter().map(|u| u.render(&fields)).collect(), Vec::new(), meta))
    }
}

pub fn app() -> Router {
    app_with(Arc::new(RwLock::new(Store::seeded())))
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/oauth2/token", post(issue_token))
        .route("/oauth2/invalidate_token", post(invalidate_token))
        .route("/2/lists", post(create_list))
        .route("/2/lists/{id}", get(lookup_list).put(update_list).delete(delete_list))
        .route("/2/lists/{id}/members", get(list_members).post(add_member))
        .route("/2/lists/{id}/members/{user_id}", delete(remove_member))
        .route("/2/lists/{id}/followers", get(list_followers))
        .route("/2/lists/{id}/tweets", get(list_tweets))
        .route("/2/users/{id}/owned_lists", get(owned_lists))
        .route("/2/users/{id}/list_memberships", get(list_memberships))
        .route("/2/users/{id}/followed_lists", get(followed_lists).post(follow_list))
        .route("/2/users/{id}/followed_lists/{list_id}", delete(unfollow_list))
        .route("/2/users/{id}/pinned_lists", get(pinned_lists).post(pin_list))
        .route("/2/users/{id}/pinned_lists/{list_id}", delete(unpin_list))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn issue_token(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> ApiResult {
    if !consumer_authorized(&headers) {
        return Err(Failure::oauth(
            StatusCode::FORBIDDEN,
            99,
            "Unable to verify your credentials",
            Some("authenticity_token_error"),
        ));
    }
    if form.get("grant_type").map(String::as_str) != Some("client_credentials") {
        return Err(Failure::oauth(
            StatusCode::FORBIDDEN,
            170,
            "Missing required parameter: grant_type",
            Some("forbidden_missing_parameter"),
        ));
    }
    let token = format!("AAAAAAAAAAAAAAAAAAAAA{}", Uuid::new_v4().simple());
    db.write().await.app_tokens.insert(token.clone());
    Ok(Json(json!({"token_type": "bearer", "access_token": token})))
}

async fn invalidate_token(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> ApiResult {
    if !consumer_authorized(&headers) {
        return Err(Failure::oauth(
            StatusCode::FORBIDDEN,
            99,
            "Unable to verify your credentials",
            Some("authenticity_token_error"),
        ));
    }
    let token = form.get("access_token").cloned().unwrap_or_default();
    if !db.write().await.app_tokens.remove(&token) {
        return Err(Failure::oauth(StatusCode::UNAUTHORIZED, 89, "Invalid or expired token.", None));
    }
    Ok(Json(json!({ "access_token": token })))
}

async fn lookup_list(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult {
    let store = db.read().await;
    authorize(&store, &headers, Access::AppOrUser)?;
    let list = store.list(numeric_id(&id)?)?;

    let mut body = Map::new();
    body.insert("data".to_string(), list.render(&requested(&params, "list.fields")));
    if requested(&params, "expansions").contains(&"owner_id") {
        let owners = store.expanded_users([list.owner_id.clone()], &params);
        body.insert("includes".to_string(), json!({ "users": owners }));
    }
    Ok(Json(Value::Object(body)))
}

async fn owned_lists(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult {
    let store = db.read().await;
    authorize(&store, &headers, Access::AppOrUser)?;
    let user = store.user(numeric_id(&id)?)?;
    let lists = store.lists.values().filter(|l| l.owner_id == user.id).collect();
    store.lists_page(lists, &params)
}

async fn list_memberships(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult {
    let store = db.read().await;
    authorize(&store, &headers, Access::AppOrUser)?;
    let user = store.user(numeric_id(&id)?)?;
    let lists = store.lists.values().filter(|l| l.members.contains(&user.id)).collect();
    store.lists_page(lists, &params)
}

async fn followed_lists(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult {
    let store = db.read().await;
    authorize(&store, &headers, Access::AppOrUser)?;
    let user = store.user(numeric_id(&id)?)?;
    let lists = store.lists.values().filter(|l| l.followers.contains(&user.id)).collect();
    store.lists_page(lists, &params)
}

async fn pinned_lists(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult {
    let store = db.read().await;
    authorize(&store, &headers, Access::UserOnly)?;
    let user = store.user(numeric_id(&id)?)?;
    let lists: Vec<&ListRecord> = store
        .pinned
        .get(&user.id)
        .map(|ids| ids.iter().filter_map(|id| store.lists.get(id)).collect())
        .unwrap_or_default();
    store.lists_page(lists, &params)
}

async fn list_members(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult {
    let store = db.read().await;
    authorize(&store, &headers, Access::AppOrUser)?;
    let list = store.list(numeric_id(&id)?)?;
    store.users_page(&list.members, &params)
}

async fn list_followers(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult {
    let store = db.read().await;
    authorize(&store, &headers, Access::AppOrUser)?;
    let list = store.list(numeric_id(&id)?)?;
    store.users_page(&list.followers, &params)
}

async fn list_tweets(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult {
    let store = db.read().await;
    authorize(&store, &headers, Access::AppOrUser)?;
    let list = store.list(numeric_id(&id)?)?;

    let mut tweets: Vec<&Tweet> = store
        .tweets
        .iter()
        .filter(|t| list.members.contains(&t.author_id))
        .collect();
    tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let (page, meta) = paginate(&tweets, &params)?;

    let fields = requested(&params, "tweet.fields");
    let includes = if requested(&params, "expansions").contains(&"author_id") {
        store.expanded_users(page.iter().map(|t| t.author_id.clone()), &params)
    } else {
        Vec::new()
    };
    Ok(page_body(page.iter().map(|t| t.render(&fields)).collect(), includes, meta))
}

async fn add_member(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UserIdBody>,
) -> ApiResult {
    let mut store = db.write().await;
    authorize(&store, &headers, Access::UserOnly)?;
    let id = numeric_id(&id)?;
    store.list(id)?;
    store.user(numeric_id(&body.user_id)?)?;
    let list = store.owned_list_mut(id, "add members to")?;
    if !list.members.contains(&body.user_id) {
        list.members.push(body.user_id);
    }
    Ok(Json(json!({"data": {"is_member": true}})))
}

async fn remove_member(
    State(db): State<Db>,
    Path((id, user_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult {
    let mut store = db.write().await;
    authorize(&store, &headers, Access::UserOnly)?;
    let id = numeric_id(&id)?;
    store.user(numeric_id(&user_id)?)?;
    let list = store.owned_list_mut(id, "remove members from")?;
    list.members.retain(|m| *m != user_id);
    Ok(Json(json!({"data": {"is_member": false}})))
}

async fn follow_list(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ListIdBody>,
) -> ApiResult {
    let mut store = db.write().await;
    authorize(&store, &headers, Access::UserOnly)?;
    acting_as(numeric_id(&id)?)?;
    let list_id = numeric_id(&body.list_id)?;
    let list = store.lists.get_mut(list_id).ok_or_else(|| Failure::not_found("list", list_id))?;
    if !list.followers.contains(&id) {
        list.followers.push(id);
    }
    Ok(Json(json!({"data": {"following": true}})))
}

async fn unfollow_list(
    State(db): State<Db>,
    Path((id, list_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult {
    let mut store = db.write().await;
    authorize(&store, &headers, Access::UserOnly)?;
    acting_as(numeric_id(&id)?)?;
    let list_id = numeric_id(&list_id)?;
    let list = store.lists.get_mut(list_id).ok_or_else(|| Failure::not_found("list", list_id))?;
    list.followers.retain(|f| *f != id);
    Ok(Json(json!({"data": {"following": false}})))
}

async fn pin_list(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ListIdBody>,
) -> ApiResult {
    let mut store = db.write().await;
    authorize(&store, &headers, Access::UserOnly)?;
    acting_as(numeric_id(&id)?)?;
    store.list(numeric_id(&body.list_id)?)?;
    let pinned = store.pinned.entry(id).or_default();
    if !pinned.contains(&body.list_id) {
        pinned.push(body.list_id);
    }
    Ok(Json(json!({"data": {"pinned": true}})))
}

async fn unpin_list(
    State(db): State<Db>,
    Path((id, list_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult {
    let mut store = db.write().await;
    authorize(&store, &headers, Access::UserOnly)?;
    acting_as(numeric_id(&id)?)?;
    store.list(numeric_id(&list_id)?)?;
    if let Some(pinned) = store.pinned.get_mut(&id) {
        pinned.retain(|l| *l != list_id);
    }
    Ok(Json(json!({"data": {"pinned": false}})))
}

async fn create_list(State(db): State<Db>, headers: HeaderMap, Json(body): Json<CreateList>) -> ApiResult {
    let mut store = db.write().await;
    authorize(&store, &headers, Access::UserOnly)?;
    if body.name.trim().is_empty() {
        return Err(Failure::invalid(
            "name",
            &body.name,
            "The `name` body parameter must not be empty".to_string(),
        ));
    }
    store.next_list_id += 1;
    let list = ListRecord {
        id: store.next_list_id.to_string(),
        name: body.name,
        description: body.description,
        private: body.private,
        owner_id: AUTHENTICATED_USER_ID.to_string(),
        created_at: "2021-11-10T00:00:00.000Z".to_string(),
        members: Vec::new(),
        followers: Vec::new(),
    };
    let data = json!({"id": list.id, "name": list.name});
    store.insert_list(list);
    Ok(Json(json!({ "data": data })))
}

async fn update_list(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateList>,
) -> ApiResult {
    let mut store = db.write().await;
    authorize(&store, &headers, Access::UserOnly)?;
    let list = store.owned_list_mut(numeric_id(&id)?, "update")?;
    if let Some(name) = body.name {
        list.name = name;
    }
    if let Some(description) = body.description {
        list.description = Some(description);
    }
    if let Some(private) = body.private {
        list.private = private;
    }
    Ok(Json(json!({"data": {"updated": true}})))
}

async fn delete_list(State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap) -> ApiResult {
    let mut store = db.write().await;
    authorize(&store, &headers, Access::UserOnly)?;
    let id = numeric_id(&id)?;
    store.owned_list_mut(id, "delete")?;
    store.lists.remove(id);
    for pinned in store.pinned.values_mut() {
        pinned.retain(|l| l != id);
    }
    Ok(Json(json!({"data": {"deleted": true}})))
}
