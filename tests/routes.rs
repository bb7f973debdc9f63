use waymark::Decision;
use waymark::guard::REDIRECT_KEY;
use waymark::meta::REQUIRES_AUTH;
use waymark::path::Location;
use waymark::routes::{self, RootRedirect, View};
use waymark::table::WILDCARD_PARAM;
use waymark::test::Session;

const DECLARED: &[(&str, View)] = &[
    ("/login", View::Login),
    ("/users", View::UsersList),
    ("/users/create", View::UsersCreate),
    ("/users/1", View::UsersRead),
    ("/users/1/update", View::UsersUpdate),
    ("/users/1/subscriptions", View::UserSubscriptionsList),
    ("/users/1/subscriptions/5", View::UserSubscriptionRead),
    ("/no/such/page", View::NotFound),
];

const GATED: &[&str] = &[
    "/users",
    "/users/create",
    "/users/1",
    "/users/1/update",
    "/users/1/subscriptions",
    "/users/1/subscriptions/5",
    "/users/1/subscriptions?page=2",
    "/users?flag",
    "/users?q=a%20b",
    "/users/",
    "/users/1/subscriptions/5?page=2#top",
];

#[test]
fn declared_paths_resolve_to_their_views() {
    let table = routes::table(RootRedirect::Always).unwrap();

    for (path, view) in DECLARED {
        let matched = table.resolve(path).unwrap();
        assert_eq!(matched.leaf().and_then(|n| n.view()), Some(view), "resolving {}", path);
    }
}

#[test]
fn chains_run_root_to_leaf() {
    let table = routes::table(RootRedirect::Always).unwrap();
    let matched = table.resolve("/users/1/subscriptions/5").unwrap();

    let views: Vec<_> = matched.nodes().iter().filter_map(|n| n.view()).collect();
    assert_eq!(views, vec![
        &View::UsersList,
        &View::UsersRead,
        &View::UserSubscriptionsList,
        &View::UserSubscriptionRead,
    ]);
    assert_eq!(matched.param("userId"), Some("1"));
    assert_eq!(matched.param("subscriptionId"), Some("5"));
}

#[test]
fn resolving_twice_yields_the_same_chain() {
    let table = routes::table(RootRedirect::Always).unwrap();

    for (path, _) in DECLARED {
        assert_eq!(table.resolve(path), table.resolve(path));
    }
}

#[test]
fn anonymous_users_are_sent_to_login() {
    let navigator = routes::navigator(RootRedirect::Always, Session::anonymous()).unwrap();

    for href in GATED {
        let (route, decision) = navigator.decide(href).unwrap();
        assert!(route.requires(REQUIRES_AUTH));

        match decision {
            Decision::Login(ref to) => {
                assert_eq!(to.path(), "/login");
                assert_eq!(to.query(REDIRECT_KEY), Some(*href));
            }
            other => panic!("{} was not sent to login: {:?}", href, other),
        }
    }
}

#[test]
fn authenticated_users_are_allowed() {
    let navigator = routes::navigator(RootRedirect::Always, Session::authenticated()).unwrap();

    for href in GATED {
        let (_, decision) = navigator.decide(href).unwrap();
        assert_eq!(decision, Decision::Allow, "navigating to {}", href);
    }
}

#[test]
fn login_and_not_found_are_always_allowed() {
    for session in vec![Session::anonymous(), Session::authenticated()] {
        let navigator = routes::navigator(RootRedirect::Always, session).unwrap();

        let (_, decision) = navigator.decide("/login?redirect=%2Fusers").unwrap();
        assert_eq!(decision, Decision::Allow);

        let (route, decision) = navigator.decide("/users-but-not-really/7").unwrap();
        assert_eq!(decision, Decision::Allow);
        assert_eq!(route.view(), Some(&View::NotFound));
        assert_eq!(route.param(WILDCARD_PARAM), Some("/users-but-not-really/7"));
    }
}

#[test]
fn params_are_decoded() {
    let navigator = routes::navigator(RootRedirect::Always, Session::authenticated()).unwrap();

    let (route, decision) = navigator.decide("/users/j%C3%BCrgen/subscriptions/a b").unwrap();
    assert_eq!(decision, Decision::Allow);
    assert_eq!(route.view(), Some(&View::UserSubscriptionRead));
    assert_eq!(route.param("userId"), Some("jürgen"));
    assert_eq!(route.param("subscriptionId"), Some("a b"));
}

#[test]
fn subscription_redirects_to_login() {
    let navigator = routes::navigator(RootRedirect::Always, Session::anonymous()).unwrap();

    let navigation = navigator.navigate("/users/1/subscriptions/5").unwrap();
    assert_eq!(navigation.route.view(), Some(&View::Login));
    assert_eq!(navigation.route.path(), "/login");
    assert_eq!(navigation.route.location().query("redirect"), Some("/users/1/subscriptions/5"));
    assert_eq!(navigation.route.full_path(), "/login?redirect=%2Fusers%2F1%2Fsubscriptions%2F5");
    assert_eq!(navigation.redirects, vec![Location::new("/users/1/subscriptions/5")]);
}

#[test]
fn session_changes_are_seen_by_the_guard() {
    let session = Session::anonymous();
    let navigator = routes::navigator(RootRedirect::Always, session.clone()).unwrap();

    assert_eq!(navigator.navigate("/users").unwrap().route.view(), Some(&View::Login));
    session.log_in();
    assert_eq!(navigator.navigate("/users").unwrap().route.view(), Some(&View::UsersList));
    session.log_out();
    assert_eq!(navigator.navigate("/users").unwrap().route.view(), Some(&View::Login));
}

#[test]
fn root_always_redirects_to_users() {
    let anonymous = routes::navigator(RootRedirect::Always, Session::anonymous()).unwrap();
    let navigation = anonymous.navigate("/").unwrap();
    assert_eq!(navigation.route.view(), Some(&View::Login));
    assert_eq!(navigation.route.location().query("redirect"), Some("/users"));

    let authenticated = routes::navigator(RootRedirect::Always, Session::authenticated()).unwrap();
    let navigation = authenticated.navigate("/").unwrap();
    assert_eq!(navigation.route.view(), Some(&View::UsersList));
    assert_eq!(navigation.redirects, vec![Location::new("/")]);
}

#[test]
fn root_redirects_only_when_authenticated() {
    let anonymous = routes::navigator(RootRedirect::WhenAuthenticated, Session::anonymous()).unwrap();
    let (_, decision) = anonymous.decide("/").unwrap();
    assert_eq!(decision, Decision::Login(Location::new("/login")));

    let navigation = anonymous.navigate("/").unwrap();
    assert_eq!(navigation.route.view(), Some(&View::Login));
    assert_eq!(navigation.route.location().query("redirect"), None);

    let authenticated = routes::navigator(RootRedirect::WhenAuthenticated, Session::authenticated()).unwrap();
    let (_, decision) = authenticated.decide("/").unwrap();
    assert_eq!(decision, Decision::Landing(Location::new("/users")));
    assert_eq!(authenticated.navigate("/").unwrap().route.view(), Some(&View::UsersList));
}
