// Get Named Cookie conformance scenarios
//
// Drives the command handler the way a WebDriver client would: navigate,
// write cookies through script or Add Cookie, then read one back by name.

use serde_json::{Value, json};
use time::macros::{datetime, format_description};
use time::{Duration, OffsetDateTime};
use url::Url;
use wd::protocol::{
	AddCookieParams, CookieInput, ErrorCode, ExecuteScriptParams, NavigateParams, NewSessionParams,
	NewWindowParams, SameSite, SwitchToFrameParams, SwitchToWindowParams,
};
use wd::{Command, CommandHandler, ContextId, Defaults};

const NOW: OffsetDateTime = datetime!(2026-10-19 12:00:00 UTC);

fn fixed_clock() -> OffsetDateTime {
	NOW
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

async fn setup(url: &str) -> (CommandHandler, String) {
	init_tracing();
	let handler = CommandHandler::new(Defaults::default()).with_clock(fixed_clock);
	let id = handler.new_session(NewSessionParams::default()).unwrap().session_id;
	send(&handler, &id, Command::NavigateTo(NavigateParams { url: url.into() }))
		.await
		.unwrap();
	(handler, id)
}

async fn send(handler: &CommandHandler, id: &str, command: Command) -> wd::Result<Value> {
	handler.dispatch(Some(id), command).await
}

async fn execute(handler: &CommandHandler, id: &str, script: &str) -> Value {
	send(
		handler,
		id,
		Command::ExecuteScript(ExecuteScriptParams {
			script: script.into(),
			args: json!([]),
		}),
	)
	.await
	.unwrap()
}

async fn get_named_cookie(handler: &CommandHandler, id: &str, name: &str) -> wd::Result<Value> {
	send(handler, id, Command::GetNamedCookie { name: name.into() }).await
}

fn assert_wire_shape(cookie: &Value) {
	let object = cookie.as_object().expect("cookie is an object");
	for key in ["name", "value", "path", "domain"] {
		assert!(object[key].is_string(), "{key} should be a string");
	}
	for key in ["secure", "httpOnly"] {
		assert!(object[key].is_boolean(), "{key} should be a bool");
	}
	let same_site = object["sameSite"].as_str().expect("sameSite is a string");
	assert!(["None", "Lax", "Strict"].contains(&same_site));
}

#[tokio::test]
async fn no_top_browsing_context() {
	let (handler, id) = setup("http://web-platform.test/common/blank.html").await;
	// keep a second window so the session outlives the close
	send(&handler, &id, Command::NewWindow(NewWindowParams::default()))
		.await
		.unwrap();
	send(&handler, &id, Command::CloseWindow).await.unwrap();

	let err = get_named_cookie(&handler, &id, "foo").await.unwrap_err();
	assert_eq!(err.code(), ErrorCode::NoSuchWindow);
}

#[tokio::test]
async fn no_browsing_context() {
	let (handler, id) = setup("http://web-platform.test/common/blank.html").await;
	let frame = {
		let session = handler.registry().get(&id).unwrap();
		let mut session = session.lock().await;
		let top: ContextId = session.top_level_context().unwrap().id().clone();
		session
			.attach_frame(&top, Url::parse("http://web-platform.test/common/frame.html").unwrap())
			.unwrap()
	};
	send(&handler, &id, Command::SwitchToFrame(SwitchToFrameParams { id: json!(0) }))
		.await
		.unwrap();
	{
		let session = handler.registry().get(&id).unwrap();
		session.lock().await.detach_frame(&frame).unwrap();
	}

	for name in ["foo", "bar", ""] {
		let err = get_named_cookie(&handler, &id, name).await.unwrap_err();
		assert_eq!(err.code(), ErrorCode::NoSuchWindow);
	}
}

#[tokio::test]
async fn get_named_session_cookie() {
	let (handler, id) = setup("http://web-platform.test/common/blank.html").await;
	send(&handler, &id, Command::DeleteAllCookies).await.unwrap();
	execute(&handler, &id, "document.cookie = 'foo=bar'").await;

	let cookie = get_named_cookie(&handler, &id, "foo").await.unwrap();
	assert_wire_shape(&cookie);
	assert!(cookie.get("expiry").is_none());
	assert_eq!(cookie["name"], "foo");
	assert_eq!(cookie["value"], "bar");
	assert_eq!(cookie["path"], "/common");
	assert_eq!(cookie["domain"], "web-platform.test");
}

#[tokio::test]
async fn get_named_cookie_with_expiry() {
	let (handler, id) = setup("http://web-platform.test/common/blank.html").await;
	let utc_string = format_description!(
		"[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second]"
	);
	let a_day_from_now = (NOW + Duration::days(1)).format(utc_string).unwrap();
	execute(&handler, &id, &format!("document.cookie = 'foo=bar;expires={a_day_from_now}'")).await;

	let cookie = get_named_cookie(&handler, &id, "foo").await.unwrap();
	assert_wire_shape(&cookie);
	assert_eq!(cookie["name"], "foo");
	assert_eq!(cookie["value"], "bar");

	let expiry = cookie["expiry"].as_i64().expect("expiry is an integer");
	let reformatted = OffsetDateTime::from_unix_timestamp(expiry)
		.unwrap()
		.format(utc_string)
		.unwrap();
	assert_eq!(reformatted, a_day_from_now);
}

#[tokio::test]
async fn duplicated_cookie_is_overwritten_by_script() {
	let (handler, id) = setup("http://web-platform.test/common/blank.html").await;
	send(
		&handler,
		&id,
		Command::AddCookie(AddCookieParams {
			cookie: CookieInput::new("hello", "world")
				.domain("web-platform.test")
				.path("/")
				.http_only(false)
				.secure(false),
		}),
	)
	.await
	.unwrap();

	send(
		&handler,
		&id,
		Command::NavigateTo(NavigateParams {
			url: "http://web-platform.test/inline".into(),
		}),
	)
	.await
	.unwrap();
	execute(&handler, &id, "document.cookie = 'hello=newworld; domain=web-platform.test; path=/';").await;

	let cookie = get_named_cookie(&handler, &id, "hello").await.unwrap();
	assert_wire_shape(&cookie);
	assert_eq!(cookie["name"], "hello");
	assert_eq!(cookie["value"], "newworld");
	assert_eq!(cookie["domain"], ".web-platform.test");

	let all = send(&handler, &id, Command::GetAllCookies).await.unwrap();
	assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn same_site_flag_round_trips() {
	for same_site in [SameSite::None, SameSite::Lax, SameSite::Strict] {
		let (handler, id) = setup("https://web-platform.test/common/blank.html").await;
		execute(&handler, &id, &format!("document.cookie = 'foo=bar;Secure;SameSite={same_site}'")).await;

		let cookie = get_named_cookie(&handler, &id, "foo").await.unwrap();
		assert_wire_shape(&cookie);
		assert_eq!(cookie["sameSite"], same_site.as_str());
		assert_eq!(cookie["secure"], true);
	}
}

#[tokio::test]
async fn longest_path_wins() {
	let (handler, id) = setup("http://web-platform.test/a/b/page.html").await;
	execute(
		&handler,
		&id,
		"document.cookie = 'sid=root; path=/'; document.cookie = 'sid=deep; path=/a/b'",
	)
	.await;

	let cookie = get_named_cookie(&handler, &id, "sid").await.unwrap();
	assert_eq!(cookie["value"], "deep");
	assert_eq!(cookie["path"], "/a/b");
}

#[tokio::test]
async fn missing_cookie_is_no_such_cookie() {
	let (handler, id) = setup("http://web-platform.test/").await;
	let err = get_named_cookie(&handler, &id, "absent").await.unwrap_err();
	assert_eq!(err.code(), ErrorCode::NoSuchCookie);
}

#[tokio::test]
async fn cookies_are_scoped_to_their_window() {
	let (handler, id) = setup("http://web-platform.test/").await;
	execute(&handler, &id, "document.cookie = 'foo=bar'").await;

	let created = send(&handler, &id, Command::NewWindow(NewWindowParams::default()))
		.await
		.unwrap();
	let handle = created["handle"].as_str().unwrap().to_string();
	send(&handler, &id, Command::SwitchToWindow(SwitchToWindowParams { handle }))
		.await
		.unwrap();
	send(
		&handler,
		&id,
		Command::NavigateTo(NavigateParams {
			url: "http://web-platform.test/".into(),
		}),
	)
	.await
	.unwrap();

	let err = get_named_cookie(&handler, &id, "foo").await.unwrap_err();
	assert_eq!(err.code(), ErrorCode::NoSuchCookie);
}

#[tokio::test]
async fn configured_same_site_default_applies_to_unset_cookies() {
	init_tracing();
	let handler = CommandHandler::new(Defaults {
		same_site: SameSite::Strict,
		..Defaults::default()
	})
	.with_clock(fixed_clock);
	let id = handler.new_session(NewSessionParams::default()).unwrap().session_id;
	handler.navigate_to(&id, "http://web-platform.test/").await.unwrap();
	execute(&handler, &id, "document.cookie = 'foo=bar'").await;

	let cookie = get_named_cookie(&handler, &id, "foo").await.unwrap();
	assert_eq!(cookie["sameSite"], "Strict");
}

#[tokio::test]
async fn expired_cookie_is_not_returned() {
	let (handler, id) = setup("http://web-platform.test/").await;
	let expiry = (NOW + Duration::seconds(30)).unix_timestamp() as u64;
	send(
		&handler,
		&id,
		Command::AddCookie(AddCookieParams {
			cookie: CookieInput::new("soon", "gone").expiry(expiry),
		}),
	)
	.await
	.unwrap();
	assert!(get_named_cookie(&handler, &id, "soon").await.is_ok());

	execute(&handler, &id, "document.cookie = 'soon=; Max-Age=0'").await;
	let err = get_named_cookie(&handler, &id, "soon").await.unwrap_err();
	assert_eq!(err.code(), ErrorCode::NoSuchCookie);
}
