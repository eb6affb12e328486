use std::time::Duration;

use pipe::{Pipe, Source, Tester};

#[tokio::test(flavor = "multi_thread")]
async fn pushes_from_task_arrive_in_order() {
    let source = Source::new();
    let tester = Tester::test(&Pipe::from_source(&source));

    let emitter = source.clone();
    let handle = tokio::task::spawn(async move {
        for i in 0..100u32 {
            emitter.push(i);
            if i % 10 == 0 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }
    });
    handle.await.unwrap();

    let expected: Vec<u32> = (0..100).collect();
    tester.assert_values(&expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn tester_moved_across_tasks() {
    let source = Source::new();
    let tester = Tester::test(&source);

    source.push("A");

    let checked = tokio::task::spawn(async move {
        tester.assert_values(&["A"]);
        tester
    })
    .await
    .unwrap();

    source.push("B");
    checked.assert_values(&["A", "B"]);
}
