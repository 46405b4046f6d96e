use std::collections::HashSet;

use printhub_db::{create_pool, DbConnectionConfig};
use printhub_queue::{ArtifactStore, Direction, NewJob, NewWorker, QueueError, QueueService};
use uuid::Uuid;

async fn setup() -> (QueueService, tempfile::TempDir) {
    // A single connection keeps the in-memory database alive and shared.
    let mut cfg = DbConnectionConfig::new("sqlite::memory:");
    cfg.max_connections = 1;
    cfg.min_connections = 1;
    let pool = create_pool(&cfg).await.expect("create pool");
    printhub_migrations::sqlite_migrator()
        .run(&pool)
        .await
        .expect("run migrations");

    let dir = tempfile::tempdir().expect("artifacts dir");
    let service = QueueService::new(pool, ArtifactStore::new(dir.path()));
    (service, dir)
}

fn owner() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap()
}

fn new_job(title: &str, color: &str, material: &str, qty: i64) -> NewJob {
    NewJob {
        title: title.to_string(),
        color: color.to_string(),
        material: material.to_string(),
        qty,
        comment: None,
        group_id: None,
        filename: format!("{title}.gcode"),
        bytes: b"G28\nG1 X10 Y10\n".to_vec(),
        overwrite: false,
    }
}

async fn register_worker(service: &QueueService, name: &str, color: &str, material: &str) -> Uuid {
    service
        .create_worker(
            owner(),
            NewWorker {
                name: name.to_string(),
                color: color.to_string(),
                material: material.to_string(),
            },
        )
        .await
        .expect("create worker")
        .id
}

async fn assert_dense(service: &QueueService) {
    let queued = service.list_queued().await.expect("list queued");
    let mut positions: Vec<i64> = queued
        .iter()
        .map(|j| j.queue_position.expect("queued job has a position"))
        .collect();
    positions.sort_unstable();
    let expected: Vec<i64> = (1..=queued.len() as i64).collect();
    assert_eq!(
        positions, expected,
        "queued positions must form a dense 1..N permutation"
    );
}

async fn queued_titles(service: &QueueService) -> Vec<String> {
    service
        .list_queued()
        .await
        .expect("list queued")
        .into_iter()
        .map(|j| j.title)
        .collect()
}

#[tokio::test]
async fn submissions_enqueue_at_tail() {
    let (service, _dir) = setup().await;
    for (i, title) in ["a", "b", "c"].iter().enumerate() {
        let row = service
            .submit_job(owner(), new_job(title, "PLA", "Black", 1))
            .await
            .expect("submit");
        assert_eq!(row.queue_position, Some(i as i64 + 1));
    }
    assert_dense(&service).await;
    assert_eq!(queued_titles(&service).await, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn submit_rejects_zero_quantity() {
    let (service, _dir) = setup().await;
    let err = service
        .submit_job(owner(), new_job("bad", "PLA", "Black", 0))
        .await
        .expect_err("qty 0 must be rejected");
    assert!(matches!(err, QueueError::InvalidState(_)));
}

#[tokio::test]
async fn duplicate_live_artifact_name_conflicts_unless_overwrite() {
    let (service, _dir) = setup().await;
    service
        .submit_job(owner(), new_job("benchy", "PLA", "Black", 1))
        .await
        .expect("first submit");

    let mut dup = new_job("benchy2", "PLA", "Black", 1);
    dup.filename = "benchy.gcode".to_string();
    let err = service
        .submit_job(owner(), dup.clone())
        .await
        .expect_err("filename in use");
    assert!(matches!(err, QueueError::ArtifactConflict(_)));

    dup.overwrite = true;
    service
        .submit_job(owner(), dup)
        .await
        .expect("overwrite requested");
    assert_dense(&service).await;
}

#[tokio::test]
async fn dispatch_matches_filament_and_compacts_survivors() {
    // Queue = [A(PLA/Black), B(PETG/Red)]; a PLA/Black worker takes A and
    // B moves up to position 1.
    let (service, _dir) = setup().await;
    let a = service
        .submit_job(owner(), new_job("A", "PLA", "Black", 1))
        .await
        .expect("submit A");
    let b = service
        .submit_job(owner(), new_job("B", "PETG", "Red", 1))
        .await
        .expect("submit B");

    let worker = register_worker(&service, "prusa-1", "PLA", "Black").await;
    let dispatch = service
        .request_work(worker)
        .await
        .expect("request work")
        .expect("A is eligible");
    assert_eq!(dispatch.job_id, a.id);
    assert_eq!(dispatch.code, "A.gcode");

    let a_row = service.find_job(a.id).await.expect("find").expect("exists");
    assert_eq!(a_row.status, "printing");
    assert_eq!(a_row.printer_id, Some(worker));
    assert!(a_row.date_print_start.is_some());
    assert_eq!(a_row.queue_position, None);

    let b_row = service.find_job(b.id).await.expect("find").expect("exists");
    assert_eq!(b_row.queue_position, Some(1));
    assert_dense(&service).await;

    let worker_row = service
        .find_worker(worker)
        .await
        .expect("find worker")
        .expect("exists");
    assert_eq!(worker_row.status, "printing");
}

#[tokio::test]
async fn no_eligible_job_is_an_empty_result() {
    let (service, _dir) = setup().await;
    service
        .submit_job(owner(), new_job("A", "PETG", "Red", 1))
        .await
        .expect("submit");
    let worker = register_worker(&service, "prusa-1", "PLA", "Black").await;
    let dispatch = service.request_work(worker).await.expect("request work");
    assert!(dispatch.is_none());
    // Nothing changed for the worker either.
    let row = service
        .find_worker(worker)
        .await
        .expect("find worker")
        .expect("exists");
    assert_eq!(row.status, "available");
}

#[tokio::test]
async fn unknown_worker_is_an_error() {
    let (service, _dir) = setup().await;
    let err = service
        .request_work(Uuid::new_v4())
        .await
        .expect_err("unknown worker");
    assert!(matches!(err, QueueError::WorkerNotFound(_)));
}

#[tokio::test]
async fn multi_quantity_job_splits_then_transitions() {
    // qty=5: each dispatch of a multi-unit job sheds a printing sibling and
    // decrements the original; the final unit transitions in place.
    let (service, _dir) = setup().await;
    let job = service
        .submit_job(owner(), new_job("batch", "PLA", "Black", 5))
        .await
        .expect("submit");
    let worker = register_worker(&service, "prusa-1", "PLA", "Black").await;

    let mut sibling_ids = HashSet::new();
    for expected_qty in [4, 3, 2, 1] {
        let dispatch = service
            .request_work(worker)
            .await
            .expect("request work")
            .expect("eligible");
        assert_ne!(dispatch.job_id, job.id, "split dispatch creates a sibling");
        assert!(sibling_ids.insert(dispatch.job_id));

        let original = service.find_job(job.id).await.expect("find").expect("exists");
        assert_eq!(original.qty, expected_qty);
        assert_eq!(original.status, "queue");
        assert_eq!(original.queue_position, Some(1), "split leaves position untouched");

        let sibling = service
            .find_job(dispatch.job_id)
            .await
            .expect("find")
            .expect("exists");
        assert_eq!(sibling.qty, 1);
        assert_eq!(sibling.status, "printing");
        assert_eq!(sibling.code, original.code, "siblings share the artifact");
        assert_eq!(sibling.upload_id, original.upload_id);
        assert_eq!(sibling.date_posted, original.date_posted);
    }

    // Last unit: the original itself transitions in place.
    let dispatch = service
        .request_work(worker)
        .await
        .expect("request work")
        .expect("eligible");
    assert_eq!(dispatch.job_id, job.id);
    let original = service.find_job(job.id).await.expect("find").expect("exists");
    assert_eq!(original.status, "printing");
    assert_eq!(original.qty, 1);
    assert_eq!(original.queue_position, None);
    assert_dense(&service).await;

    // Queue drained entirely.
    assert!(service.list_queued().await.expect("list").is_empty());
}

#[tokio::test]
async fn completion_drains_all_split_units() {
    let (service, _dir) = setup().await;
    let job = service
        .submit_job(owner(), new_job("batch", "PLA", "Black", 3))
        .await
        .expect("submit");
    let worker = register_worker(&service, "prusa-1", "PLA", "Black").await;

    for _ in 0..3 {
        service
            .request_work(worker)
            .await
            .expect("request work")
            .expect("eligible");
    }

    let completed = service.report_complete(worker).await.expect("complete");
    assert_eq!(completed, 3, "all accumulated printing units complete");

    let worker_row = service
        .find_worker(worker)
        .await
        .expect("find worker")
        .expect("exists");
    assert_eq!(worker_row.status, "available");

    let original = service.find_job(job.id).await.expect("find").expect("exists");
    assert_eq!(original.status, "completed");
    assert!(original.date_print_finish.is_some());

    // Second report with nothing in flight: empty result, state unchanged.
    let completed = service.report_complete(worker).await.expect("complete");
    assert_eq!(completed, 0);
    let worker_row = service
        .find_worker(worker)
        .await
        .expect("find worker")
        .expect("exists");
    assert_eq!(worker_row.status, "available");
}

#[tokio::test]
async fn delete_compacts_positions_behind_the_hole() {
    let (service, _dir) = setup().await;
    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d"] {
        ids.push(
            service
                .submit_job(owner(), new_job(title, "PLA", "Black", 1))
                .await
                .expect("submit")
                .id,
        );
    }

    // Delete position 2 of 4: a keeps 1, c and d shift to 2 and 3.
    service.delete_job(owner(), ids[1]).await.expect("delete");
    assert_dense(&service).await;
    assert_eq!(queued_titles(&service).await, vec!["a", "c", "d"]);
    assert!(service.find_job(ids[1]).await.expect("find").is_none());
}

#[tokio::test]
async fn delete_requires_ownership_and_queue_status() {
    let (service, _dir) = setup().await;
    let job = service
        .submit_job(owner(), new_job("a", "PLA", "Black", 1))
        .await
        .expect("submit");

    let stranger = Uuid::new_v4();
    let err = service
        .delete_job(stranger, job.id)
        .await
        .expect_err("owner mismatch");
    assert!(matches!(err, QueueError::PermissionDenied));

    let err = service
        .delete_job(owner(), Uuid::new_v4())
        .await
        .expect_err("unknown job");
    assert!(matches!(err, QueueError::JobNotFound(_)));

    // Printing jobs cannot be deleted.
    let worker = register_worker(&service, "prusa-1", "PLA", "Black").await;
    service
        .request_work(worker)
        .await
        .expect("request work")
        .expect("eligible");
    let err = service
        .delete_job(owner(), job.id)
        .await
        .expect_err("printing job");
    assert!(matches!(err, QueueError::InvalidState(_)));
}

#[tokio::test]
async fn reorder_swaps_and_range_shifts() {
    let (service, _dir) = setup().await;
    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d"] {
        ids.push(
            service
                .submit_job(owner(), new_job(title, "PLA", "Black", 1))
                .await
                .expect("submit")
                .id,
        );
    }

    service.reorder(ids[2], Direction::Up).await.expect("up");
    assert_eq!(queued_titles(&service).await, vec!["a", "c", "b", "d"]);

    service.reorder(ids[2], Direction::Down).await.expect("down");
    assert_eq!(queued_titles(&service).await, vec!["a", "b", "c", "d"]);

    service.reorder(ids[3], Direction::Top).await.expect("top");
    assert_eq!(queued_titles(&service).await, vec!["d", "a", "b", "c"]);

    service
        .reorder(ids[3], Direction::Bottom)
        .await
        .expect("bottom");
    assert_eq!(queued_titles(&service).await, vec!["a", "b", "c", "d"]);
    assert_dense(&service).await;
}

#[tokio::test]
async fn move_to_top_then_bottom_preserves_other_order() {
    let (service, _dir) = setup().await;
    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d", "e"] {
        ids.push(
            service
                .submit_job(owner(), new_job(title, "PLA", "Black", 1))
                .await
                .expect("submit")
                .id,
        );
    }

    service.reorder(ids[2], Direction::Top).await.expect("top");
    service
        .reorder(ids[2], Direction::Bottom)
        .await
        .expect("bottom");

    // Everyone else keeps their relative order.
    assert_eq!(queued_titles(&service).await, vec!["a", "b", "d", "e", "c"]);
    assert_dense(&service).await;
}

#[tokio::test]
async fn reorder_rejects_moves_past_the_ends() {
    let (service, _dir) = setup().await;
    let first = service
        .submit_job(owner(), new_job("a", "PLA", "Black", 1))
        .await
        .expect("submit");
    let last = service
        .submit_job(owner(), new_job("b", "PLA", "Black", 1))
        .await
        .expect("submit");

    let err = service
        .reorder(first.id, Direction::Up)
        .await
        .expect_err("already first");
    assert!(matches!(err, QueueError::OutOfRange(_)));

    let err = service
        .reorder(last.id, Direction::Down)
        .await
        .expect_err("already last");
    assert!(matches!(err, QueueError::OutOfRange(_)));

    let err = service
        .reorder(Uuid::new_v4(), Direction::Up)
        .await
        .expect_err("unknown job");
    assert!(matches!(err, QueueError::JobNotFound(_)));

    // Top/bottom on a job already there are no-ops.
    service.reorder(first.id, Direction::Top).await.expect("top no-op");
    service
        .reorder(last.id, Direction::Bottom)
        .await
        .expect("bottom no-op");
    assert_eq!(queued_titles(&service).await, vec!["a", "b"]);
}

#[tokio::test]
async fn worker_names_are_unique() {
    let (service, _dir) = setup().await;
    register_worker(&service, "prusa-1", "PLA", "Black").await;
    let err = service
        .create_worker(
            owner(),
            NewWorker {
                name: "prusa-1".to_string(),
                color: "PETG".to_string(),
                material: "Red".to_string(),
            },
        )
        .await
        .expect_err("duplicate name");
    assert!(matches!(err, QueueError::WorkerNameConflict(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatch_never_double_dispatches() {
    // File-backed database so multiple pooled connections share state.
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("hub.sqlite");
    let mut cfg = DbConnectionConfig::new(format!("sqlite://{}", db_path.display()));
    cfg.max_connections = 8;
    let pool = create_pool(&cfg).await.expect("create pool");
    printhub_migrations::sqlite_migrator()
        .run(&pool)
        .await
        .expect("run migrations");
    let service = QueueService::new(pool, ArtifactStore::new(dir.path().join("artifacts")));

    let n_workers = 4usize;
    let m_jobs = 6usize;
    for i in 0..m_jobs {
        service
            .submit_job(owner(), new_job(&format!("job-{i}"), "PLA", "Black", 1))
            .await
            .expect("submit");
    }
    let mut worker_ids = Vec::new();
    for i in 0..n_workers {
        worker_ids.push(register_worker(&service, &format!("prusa-{i}"), "PLA", "Black").await);
    }

    let mut handles = Vec::new();
    for worker_id in worker_ids {
        let svc = service.clone();
        handles.push(tokio::spawn(
            async move { svc.request_work(worker_id).await },
        ));
    }

    let mut dispatched = HashSet::new();
    for handle in handles {
        let dispatch = handle
            .await
            .expect("task join")
            .expect("request work")
            .expect("enough eligible jobs for every worker");
        assert!(
            dispatched.insert(dispatch.job_id),
            "no job may be dispatched twice"
        );
    }
    assert_eq!(dispatched.len(), n_workers);

    // The survivors form a dense permutation over the remainder.
    assert_dense(&service).await;
    let queued = service.list_queued().await.expect("list queued");
    assert_eq!(queued.len(), m_jobs - n_workers);
}
